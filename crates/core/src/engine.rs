//! Per-report reconciliation pipelines.
//!
//! Each pipeline runs extract, then directory lookup, then classification
//! where the report calls for it, and assembles output rows in extraction
//! order. Progress is reported at fixed milestones; the caller signals 1.0
//! once the table has been written out.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::classify;
use crate::directory::{ContactDirectory, DEFAULT_FUZZY_THRESHOLD};
use crate::error::EngineError;
use crate::extract::certificate::CERTIFICATE_COLUMNS;
use crate::extract::renewal::RENEWAL_COLUMNS;
use crate::extract::tasks::TASK_COLUMNS;
use crate::extract::{billing, certificate, filename, renewal, tasks};
use crate::model::{Cell, Contact, OutputTable, RunReport, RunSummary, Table};
use crate::normalize;
use crate::report::ReportKind;
use crate::sink::{LogSink, ProgressSink};

const PROGRESS_LOADED: f64 = 0.2;
const PROGRESS_EXTRACTED: f64 = 0.4;
const PROGRESS_MATCHED: f64 = 0.6;
const PROGRESS_ASSEMBLED: f64 = 0.8;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Inputs for one reconciliation run, one variant per report kind.
pub enum ReportJob {
    /// ONE: client codes scraped from PDF file names.
    FilenameScan {
        folder: PathBuf,
        files: Vec<String>,
        contacts: Table,
    },
    /// Cobranca: parcels from extracted statement text.
    BillingPdf { text: String, contacts: Table },
    /// ProrContrato: contract renewals from a base table.
    ContractRenewal { base: Table, contacts: Table },
    /// ComuniCertificado: certificate notices from a base table.
    CertificateNotice { base: Table, contacts: Table },
    /// DomBot_GMS: robot task schedule. Contacts play no part.
    TaskSchedule {
        base: Table,
        period: Option<String>,
    },
    /// ALL: generic origin-to-contacts cross match.
    CrossMatch { origin: Table, contacts: Table },
}

impl ReportJob {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::FilenameScan { .. } => ReportKind::One,
            Self::BillingPdf { .. } => ReportKind::Cobranca,
            Self::ContractRenewal { .. } => ReportKind::ProrContrato,
            Self::CertificateNotice { .. } => ReportKind::ComuniCertificado,
            Self::TaskSchedule { .. } => ReportKind::DomBotGms,
            Self::CrossMatch { .. } => ReportKind::All,
        }
    }
}

/// Ambient run state: the clock and the caller's sinks.
pub struct RunContext<'a> {
    pub today: NaiveDate,
    pub log: &'a dyn LogSink,
    pub progress: &'a dyn ProgressSink,
}

/// Run one report end to end, up to (not including) the write.
pub fn run(job: ReportJob, ctx: &RunContext) -> Result<RunReport, EngineError> {
    let kind = job.kind();
    let (table, mut summary) = match job {
        ReportJob::FilenameScan {
            folder,
            files,
            contacts,
        } => filename_report(&folder, &files, &contacts, ctx)?,
        ReportJob::BillingPdf { text, contacts } => billing_report(&text, &contacts, ctx)?,
        ReportJob::ContractRenewal { base, contacts } => renewal_report(&base, &contacts, ctx)?,
        ReportJob::CertificateNotice { base, contacts } => {
            certificate_report(&base, &contacts, ctx)?
        }
        ReportJob::TaskSchedule { base, period } => task_report(&base, period.as_deref(), ctx)?,
        ReportJob::CrossMatch { origin, contacts } => cross_match_report(&origin, &contacts, ctx)?,
    };

    summary.rows = table.rows.len();
    ctx.log.log(&format!("Report assembled: {} rows", summary.rows));
    ctx.progress.progress(PROGRESS_ASSEMBLED);

    Ok(RunReport {
        kind,
        summary,
        table,
    })
}

type PipelineOutput = (OutputTable, RunSummary);

fn filename_report(
    folder: &Path,
    files: &[String],
    contacts: &Table,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    ctx.log.log(&format!("Found {} PDF files", files.len()));
    let directory = ContactDirectory::from_table(contacts)?;
    ctx.log.log(&format!("Contacts indexed: {}", directory.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    let matches = filename::scan(files);
    for m in &matches {
        ctx.log.log(&format!("Code {} from {}", m.code, m.file_name));
    }
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let mut summary = RunSummary::default();
    let mut rows = Vec::with_capacity(matches.len());
    for m in matches {
        let path = folder.join(&m.file_name).display().to_string();
        match directory.lookup_code(&m.code) {
            Some(contact) => {
                summary.matched_code += 1;
                rows.push(vec![
                    Cell::Text(m.code),
                    text_or_empty(&contact.display_name),
                    text_or_empty(&contact.contact),
                    text_or_empty(&contact.group),
                    Cell::Text(path),
                ]);
            }
            None => {
                ctx.log.log(&format!("Code {} has no contacts row", m.code));
                summary.unmatched += 1;
                rows.push(vec![
                    Cell::Text(m.code),
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Text(path),
                ]);
            }
        }
    }
    ctx.progress.progress(PROGRESS_MATCHED);

    let columns = column_labels(&["Código", "Empresa", "Contato Onvio", "Grupo Onvio", "Caminho"]);
    Ok((OutputTable { columns, rows }, summary))
}

fn billing_report(
    text: &str,
    contacts: &Table,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    let directory = ContactDirectory::from_table(contacts)?;
    ctx.log.log(&format!("Contacts indexed: {}", directory.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    ctx.log.log("Extracting parcels from statement text");
    let parcels = billing::scan(text, ctx.log);
    ctx.log.log(&format!("Parcels extracted: {}", parcels.len()));
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let mut summary = RunSummary::default();
    let mut rows = Vec::with_capacity(parcels.len());
    for parcel in parcels {
        let contact = directory.lookup_code(&parcel.code);
        if contact.is_some() {
            summary.matched_code += 1;
        } else {
            summary.unmatched += 1;
        }
        let (individual, group) = contact_fields(contact);

        let tier = classify::billing_notice(parcel.due, ctx.today);
        rows.push(vec![
            Cell::Text(parcel.code),
            Cell::Text(parcel.company),
            individual,
            group,
            Cell::Number(parcel.amount_cents as f64 / 100.0),
            Cell::Text(parcel.due.format(DATE_FORMAT).to_string()),
            Cell::Number(tier as f64),
        ]);
    }
    ctx.progress.progress(PROGRESS_MATCHED);

    let columns = column_labels(&[
        "Código",
        "Empresa",
        "Contato Onvio",
        "Grupo Onvio",
        "Valor da Parcela",
        "Data de Vencimento",
        "Carta de Aviso",
    ]);
    Ok((OutputTable { columns, rows }, summary))
}

fn renewal_report(
    base: &Table,
    contacts: &Table,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    base.require_columns(RENEWAL_COLUMNS)?;
    let directory = ContactDirectory::from_table(contacts)?;
    ctx.log.log(&format!("Contacts indexed: {}", directory.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    let renewals = renewal::scan(base, ctx.today);
    ctx.log.log(&format!("Current contracts: {}", renewals.len()));
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let mut summary = RunSummary::default();
    let mut rows = Vec::with_capacity(renewals.len());
    for renewal in renewals {
        let contact = directory.lookup_code(&renewal.code);
        if contact.is_some() {
            summary.matched_code += 1;
        } else {
            summary.unmatched += 1;
        }
        let (individual, group) = contact_fields(contact);

        rows.push(vec![
            Cell::Text(renewal.code),
            individual,
            group,
            Cell::Text(renewal.person),
            Cell::Text(renewal.due.format(DATE_FORMAT).to_string()),
        ]);
    }
    ctx.progress.progress(PROGRESS_MATCHED);

    let columns = column_labels(&["Codigo", "Contato Onvio", "Grupo Onvio", "Nome", "Vencimento"]);
    Ok((OutputTable { columns, rows }, summary))
}

fn certificate_report(
    base: &Table,
    contacts: &Table,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    base.require_columns(CERTIFICATE_COLUMNS)?;
    let directory = ContactDirectory::from_table(contacts)?;
    ctx.log.log(&format!("Contacts indexed: {}", directory.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    let certificates = certificate::scan(base, ctx.log);
    ctx.log
        .log(&format!("Certificates with tax ids: {}", certificates.len()));
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let mut summary = RunSummary::default();
    let mut rows = Vec::with_capacity(certificates.len());
    for cert in certificates {
        let contact = directory.lookup_code(&cert.code);
        if contact.is_some() {
            summary.matched_code += 1;
        } else {
            summary.unmatched += 1;
        }
        let (individual, group) = contact_fields(contact);

        let tier = classify::certificate_notice(cert.due, ctx.today);
        rows.push(vec![
            Cell::Text(cert.code),
            Cell::Text(cert.company),
            individual,
            group,
            Cell::Text(cert.tax_id),
            Cell::Text(cert.due.format(DATE_FORMAT).to_string()),
            Cell::Number(tier as f64),
        ]);
    }
    ctx.progress.progress(PROGRESS_MATCHED);

    let columns = column_labels(&[
        "Codigo",
        "Empresa",
        "Contato Onvio",
        "Grupo Onvio",
        "CNPJ",
        "Vencimento",
        "Carta de Aviso",
    ]);
    Ok((OutputTable { columns, rows }, summary))
}

fn task_report(
    base: &Table,
    period: Option<&str>,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    base.require_columns(TASK_COLUMNS)?;
    ctx.log.log(&format!("Base rows: {}", base.rows.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    let task_rows = tasks::build(base, period, ctx.today)?;
    match period {
        Some(p) => ctx.log.log(&format!("Using supplied period {p}")),
        None => ctx.log.log("Using the current month as period"),
    }
    ctx.log.log(&format!("Unique tasks: {}", task_rows.len()));
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let mut rows = Vec::with_capacity(task_rows.len());
    for task in task_rows {
        rows.push(vec![
            Cell::Text(task.code),
            Cell::Text(task.company),
            Cell::Text(task.period),
            Cell::Text(task.save_as),
            Cell::Text(task.competence),
            Cell::Text(task.path),
        ]);
    }
    ctx.progress.progress(PROGRESS_MATCHED);

    let columns = column_labels(&[
        "Nº",
        "EMPRESAS",
        "Periodo",
        "Salvar Como",
        "Competencia",
        "Caminho",
    ]);
    Ok((OutputTable { columns, rows }, RunSummary::default()))
}

fn cross_match_report(
    origin: &Table,
    contacts: &Table,
    ctx: &RunContext,
) -> Result<PipelineOutput, EngineError> {
    origin.require_columns(1)?;
    let directory = ContactDirectory::from_table(contacts)?;
    ctx.log.log(&format!("Origin rows: {}", origin.rows.len()));
    ctx.log.log(&format!("Contacts indexed: {}", directory.len()));
    ctx.progress.progress(PROGRESS_LOADED);

    // Every origin row is a candidate; there is no separate extraction.
    ctx.progress.progress(PROGRESS_EXTRACTED);

    let columns = match &contacts.header {
        Some(header) if header.len() >= 4 => header[..4].to_vec(),
        _ => column_labels(&["Código", "Nome", "Contato", "Grupo"]),
    };

    let mut summary = RunSummary::default();
    let mut rows = Vec::with_capacity(origin.rows.len());
    for row in &origin.rows {
        let cell_a = row.first().cloned().unwrap_or(Cell::Empty);
        let cell_b = row.get(1).cloned().unwrap_or(Cell::Empty);

        let code = normalize::code(&cell_a);
        let key_a = normalize::name_key(&cell_a);
        let key_b = normalize::name_key(&cell_b);

        let mut matched: Option<&Contact> = None;

        if !code.is_empty() {
            if let Some(contact) = directory.lookup_code(&code) {
                matched = Some(contact);
                summary.matched_code += 1;
            }
        }
        if matched.is_none() && !key_a.is_empty() {
            if let Some(contact) = directory.lookup_name(&key_a) {
                matched = Some(contact);
                summary.matched_name += 1;
            }
        }
        if matched.is_none() && !key_b.is_empty() {
            if let Some(contact) = directory.lookup_name(&key_b) {
                matched = Some(contact);
                summary.matched_name += 1;
            }
        }
        if matched.is_none() && !key_a.is_empty() {
            if let Some((contact, score)) = directory.lookup_fuzzy(&key_a, DEFAULT_FUZZY_THRESHOLD)
            {
                ctx.log.log(&format!(
                    "Similarity {:.0}%: '{}' matched '{}'",
                    score * 100.0,
                    cell_a.display(),
                    contact.display_name
                ));
                matched = Some(contact);
                summary.matched_fuzzy += 1;
            }
        }
        if matched.is_none() && !key_b.is_empty() {
            if let Some((contact, score)) = directory.lookup_fuzzy(&key_b, DEFAULT_FUZZY_THRESHOLD)
            {
                ctx.log.log(&format!(
                    "Similarity {:.0}%: '{}' matched '{}'",
                    score * 100.0,
                    cell_b.display(),
                    contact.display_name
                ));
                matched = Some(contact);
                summary.matched_fuzzy += 1;
            }
        }

        match matched {
            Some(contact) => rows.push(vec![
                contact.raw_code.clone(),
                text_or_empty(&contact.display_name),
                text_or_empty(&contact.contact),
                text_or_empty(&contact.group),
            ]),
            None => {
                summary.unmatched += 1;
                let second = if cell_b.is_empty() {
                    cell_a.clone()
                } else {
                    cell_b.clone()
                };
                rows.push(vec![cell_a, second, Cell::Empty, Cell::Empty]);
            }
        }
    }

    ctx.log.log(&format!("Matches by code: {}", summary.matched_code));
    ctx.log.log(&format!("Matches by exact name: {}", summary.matched_name));
    ctx.log.log(&format!("Matches by similarity: {}", summary.matched_fuzzy));
    ctx.log.log(&format!("Without a match: {}", summary.unmatched));
    ctx.progress.progress(PROGRESS_MATCHED);

    Ok((OutputTable { columns, rows }, summary))
}

fn column_labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn text_or_empty(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

fn contact_fields(contact: Option<&Contact>) -> (Cell, Cell) {
    match contact {
        Some(c) => (text_or_empty(&c.contact), text_or_empty(&c.group)),
        None => (Cell::Empty, Cell::Empty),
    }
}
