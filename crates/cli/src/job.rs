//! TOML job descriptions, so a recurring report run is one file instead
//! of a row of flags.

use std::path::PathBuf;

use serde::Deserialize;

use confere_core::ReportKind;

use crate::CliError;

/// A complete description of one report run.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub report: ReportKind,
    /// PDF file (Cobranca) or folder of PDFs (ONE).
    #[serde(default)]
    pub pdf: Option<PathBuf>,
    /// Base/origin spreadsheet for the table-driven reports.
    #[serde(default)]
    pub base: Option<PathBuf>,
    /// Contacts spreadsheet: code, company, contact, group.
    #[serde(default)]
    pub contacts: Option<PathBuf>,
    pub output: PathBuf,
    /// Period override for DomBot_GMS, MM/YYYY.
    #[serde(default)]
    pub period: Option<String>,
}

impl JobSpec {
    pub fn from_toml(input: &str) -> Result<Self, CliError> {
        let spec: JobSpec =
            toml::from_str(input).map_err(|e| CliError::parse(format!("job parse error: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check that the input combination fits the chosen report kind.
    pub fn validate(&self) -> Result<(), CliError> {
        match self.report {
            ReportKind::One | ReportKind::Cobranca => {
                if self.pdf.is_none() {
                    return Err(CliError::args(format!(
                        "report {} requires a pdf input",
                        self.report
                    )));
                }
            }
            ReportKind::ProrContrato
            | ReportKind::ComuniCertificado
            | ReportKind::DomBotGms
            | ReportKind::All => {
                if self.base.is_none() {
                    return Err(CliError::args(format!(
                        "report {} requires a base spreadsheet",
                        self.report
                    )));
                }
            }
        }

        if self.report.needs_contacts() && self.contacts.is_none() {
            return Err(CliError::args(format!(
                "report {} requires a contacts spreadsheet",
                self.report
            )));
        }

        if self.period.is_some() && self.report != ReportKind::DomBotGms {
            return Err(CliError::args("period only applies to DomBot_GMS"));
        }

        Ok(())
    }

    /// The supplied period, with empty strings treated as absent.
    pub fn period(&self) -> Option<&str> {
        self.period
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_job() {
        let spec = JobSpec::from_toml(
            r#"
report = "Cobranca"
pdf = "statement.pdf"
contacts = "contacts.xlsx"
output = "out.xlsx"
"#,
        )
        .unwrap();
        assert_eq!(spec.report, ReportKind::Cobranca);
        assert_eq!(spec.pdf.as_deref(), Some(std::path::Path::new("statement.pdf")));
    }

    #[test]
    fn rejects_missing_inputs_per_kind() {
        let err = JobSpec::from_toml(
            r#"
report = "Cobranca"
contacts = "contacts.xlsx"
output = "out.xlsx"
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("pdf"));

        let err = JobSpec::from_toml(
            r#"
report = "ALL"
base = "origin.xlsx"
output = "out.xlsx"
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("contacts"));
    }

    #[test]
    fn dombot_needs_no_contacts() {
        let spec = JobSpec::from_toml(
            r#"
report = "DomBot_GMS"
base = "tasks.xlsx"
output = "out.xlsx"
period = "08/2025"
"#,
        )
        .unwrap();
        assert_eq!(spec.period(), Some("08/2025"));
    }

    #[test]
    fn period_on_other_reports_is_rejected() {
        let err = JobSpec::from_toml(
            r#"
report = "ALL"
base = "origin.xlsx"
contacts = "contacts.xlsx"
output = "out.xlsx"
period = "08/2025"
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("period"));
    }

    #[test]
    fn unknown_report_kinds_fail_deserialization() {
        let err = JobSpec::from_toml(
            r#"
report = "Nope"
output = "out.xlsx"
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("job parse error"));
    }

    #[test]
    fn blank_period_counts_as_absent() {
        let spec = JobSpec::from_toml(
            r#"
report = "DomBot_GMS"
base = "tasks.xlsx"
output = "out.xlsx"
period = "  "
"#,
        )
        .unwrap();
        assert_eq!(spec.period(), None);
    }
}
