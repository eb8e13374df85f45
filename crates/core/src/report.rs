use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of reports the engine knows how to build. Serialized
/// forms are the selector strings operators see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// Client codes scraped from PDF file names in a folder.
    #[serde(rename = "ONE")]
    One,
    /// Billing reminder parcels from a statement PDF.
    #[serde(rename = "Cobranca")]
    Cobranca,
    /// Contract renewal notices from a base table.
    #[serde(rename = "ProrContrato")]
    ProrContrato,
    /// Certificate expiry notices from a base table.
    #[serde(rename = "ComuniCertificado")]
    ComuniCertificado,
    /// Task schedule for the statement robot. Never touches contacts.
    #[serde(rename = "DomBot_GMS")]
    DomBotGms,
    /// Generic origin-to-contacts cross match.
    #[serde(rename = "ALL")]
    All,
}

impl ReportKind {
    pub const ALL_KINDS: [ReportKind; 6] = [
        ReportKind::One,
        ReportKind::Cobranca,
        ReportKind::ProrContrato,
        ReportKind::ComuniCertificado,
        ReportKind::DomBotGms,
        ReportKind::All,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Self::One => "ONE",
            Self::Cobranca => "Cobranca",
            Self::ProrContrato => "ProrContrato",
            Self::ComuniCertificado => "ComuniCertificado",
            Self::DomBotGms => "DomBot_GMS",
            Self::All => "ALL",
        }
    }

    /// Every report resolves contacts except the robot schedule.
    pub fn needs_contacts(self) -> bool {
        !matches!(self, Self::DomBotGms)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.selector() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL_KINDS.iter().map(|k| k.selector()).collect();
                format!("unknown report kind '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_round_trip() {
        for kind in ReportKind::ALL_KINDS {
            assert_eq!(kind.selector().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn selector_match_is_exact() {
        assert!("cobranca".parse::<ReportKind>().is_err());
        assert!("one".parse::<ReportKind>().is_err());
    }

    #[test]
    fn unknown_selector_lists_the_options() {
        let err = "Nope".parse::<ReportKind>().unwrap_err();
        assert!(err.contains("DomBot_GMS"));
    }

    #[test]
    fn serde_uses_the_selector_strings() {
        let json = serde_json::to_string(&ReportKind::DomBotGms).unwrap();
        assert_eq!(json, "\"DomBot_GMS\"");
        let kind: ReportKind = serde_json::from_str("\"ALL\"").unwrap();
        assert_eq!(kind, ReportKind::All);
    }
}
