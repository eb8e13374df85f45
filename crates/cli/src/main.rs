// confere - headless back-office report generator.
//
// Reads contacts and base spreadsheets (plus PDFs for the statement
// reports), runs the reconciliation engine, and writes the report
// spreadsheet. Data goes to the output file; log lines and the human
// summary go to stderr.

mod exit_codes;
mod job;
mod pdf;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::{Args, Parser, Subcommand};

use confere_core::engine::{run, ReportJob, RunContext};
use confere_core::sink::{LogSink, ProgressSink};
use confere_core::{EngineError, ReportKind, RunReport, Table};

use exit_codes::{EXIT_IO_ERROR, EXIT_PARSE_ERROR, EXIT_USAGE};
use job::JobSpec;

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn args(message: impl Into<String>) -> Self {
        CliError {
            code: EXIT_USAGE,
            message: message.into(),
            hint: None,
        }
    }

    fn io(message: impl Into<String>) -> Self {
        CliError {
            code: EXIT_IO_ERROR,
            message: message.into(),
            hint: None,
        }
    }

    fn parse(message: impl Into<String>) -> Self {
        CliError {
            code: EXIT_PARSE_ERROR,
            message: message.into(),
            hint: None,
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TooFewColumns { .. } => CliError::parse(err.to_string()),
            EngineError::PeriodFormat { .. } => CliError::args(err.to_string()),
        }
    }
}

#[derive(Parser)]
#[command(name = "confere")]
#[command(about = "Cross-reference client records against the contacts directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a report from input files
    #[command(after_help = "\
Examples:
  confere run --report ONE --pdf ./statements --contacts contacts.xlsx -o out.xlsx
  confere run --report Cobranca --pdf statement.pdf --contacts contacts.xlsx -o out.xlsx
  confere run --report ALL --base origin.xlsx --contacts contacts.xlsx -o out.xlsx --json
  confere run --report DomBot_GMS --base tasks.xlsx -o out.xlsx --period 08/2025")]
    Run(RunArgs),

    /// Run or validate a TOML job file
    #[command(subcommand)]
    Job(JobCommands),

    /// List the report kinds
    Reports,
}

#[derive(Args)]
struct RunArgs {
    /// Report kind (see `confere reports`)
    #[arg(long)]
    report: String,

    /// PDF file (Cobranca) or folder of PDFs (ONE)
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Base/origin spreadsheet
    #[arg(long)]
    base: Option<PathBuf>,

    /// Contacts spreadsheet (code, company, contact, group)
    #[arg(long)]
    contacts: Option<PathBuf>,

    /// Output spreadsheet (.xlsx or .csv)
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Period override for DomBot_GMS (MM/YYYY)
    #[arg(long)]
    period: Option<String>,

    /// Print the run summary as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Suppress log lines
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Subcommand)]
enum JobCommands {
    /// Run a job file
    #[command(after_help = "\
Examples:
  confere job run cobranca.toml
  confere job run cobranca.toml --json")]
    Run {
        config: PathBuf,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress log lines
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a job file without running it
    Validate { config: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => {
            let spec = spec_from_args(&args);
            spec.and_then(|spec| cmd_run(&spec, args.json, args.quiet))
        }
        Commands::Job(JobCommands::Run { config, json, quiet }) => {
            read_job(&config).and_then(|spec| cmd_run(&spec, json, quiet))
        }
        Commands::Job(JobCommands::Validate { config }) => read_job(&config).map(|spec| {
            eprintln!("{}: valid {} job", config.display(), spec.report);
        }),
        Commands::Reports => {
            for kind in ReportKind::ALL_KINDS {
                println!("{kind}");
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = &e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn spec_from_args(args: &RunArgs) -> Result<JobSpec, CliError> {
    let report: ReportKind = args.report.parse().map_err(CliError::args)?;
    let spec = JobSpec {
        report,
        pdf: args.pdf.clone(),
        base: args.base.clone(),
        contacts: args.contacts.clone(),
        output: args.output.clone(),
        period: args.period.clone(),
    };
    spec.validate()?;
    Ok(spec)
}

fn read_job(config: &Path) -> Result<JobSpec, CliError> {
    let input = std::fs::read_to_string(config)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", config.display(), e)))?;
    JobSpec::from_toml(&input)
}

fn cmd_run(spec: &JobSpec, json_output: bool, quiet: bool) -> Result<(), CliError> {
    let log = StderrLog { quiet };
    let progress = StderrProgress { quiet };
    let ctx = RunContext {
        today: Local::now().date_naive(),
        log: &log,
        progress: &progress,
    };

    let job = build_job(spec)?;
    let report = run(job, &ctx)?;

    confere_io::write_table(&spec.output, &report.table).map_err(CliError::io)?;
    progress.progress(1.0);
    log.log(&format!(
        "Report written to {}: {} rows",
        spec.output.display(),
        report.summary.rows
    ));

    if json_output {
        print_json(spec, &report)?;
    } else {
        print_human_summary(&report);
    }

    Ok(())
}

fn build_job(spec: &JobSpec) -> Result<ReportJob, CliError> {
    // validate() already pinned the input combination per kind; the
    // `required` checks just keep this function total.
    let contacts = match &spec.contacts {
        Some(path) => read_table(path)?,
        None => Table::default(),
    };

    let job = match spec.report {
        ReportKind::One => {
            let folder = required(&spec.pdf, "pdf folder")?.clone();
            let files = pdf::list_pdf_files(&folder)?;
            ReportJob::FilenameScan {
                folder,
                files,
                contacts,
            }
        }
        ReportKind::Cobranca => ReportJob::BillingPdf {
            text: pdf::extract_text(required(&spec.pdf, "pdf file")?)?,
            contacts,
        },
        ReportKind::ProrContrato => ReportJob::ContractRenewal {
            base: read_table(required(&spec.base, "base spreadsheet")?)?,
            contacts,
        },
        ReportKind::ComuniCertificado => ReportJob::CertificateNotice {
            base: read_table(required(&spec.base, "base spreadsheet")?)?,
            contacts,
        },
        ReportKind::DomBotGms => ReportJob::TaskSchedule {
            base: read_table(required(&spec.base, "base spreadsheet")?)?,
            period: spec.period().map(str::to_string),
        },
        ReportKind::All => ReportJob::CrossMatch {
            origin: read_table(required(&spec.base, "origin spreadsheet")?)?,
            contacts,
        },
    };
    Ok(job)
}

fn required<'a>(path: &'a Option<PathBuf>, what: &str) -> Result<&'a PathBuf, CliError> {
    path.as_ref()
        .ok_or_else(|| CliError::args(format!("missing {what} input")))
}

fn read_table(path: &Path) -> Result<Table, CliError> {
    confere_io::read_table(path).map_err(CliError::io)
}

fn print_json(spec: &JobSpec, report: &RunReport) -> Result<(), CliError> {
    let value = serde_json::json!({
        "report": report.kind,
        "output": spec.output,
        "columns": report.table.columns,
        "summary": report.summary,
    });
    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn print_human_summary(report: &RunReport) {
    let s = &report.summary;
    eprintln!(
        "{}: {} rows ({} by code, {} by name, {} fuzzy, {} unmatched)",
        report.kind, s.rows, s.matched_code, s.matched_name, s.matched_fuzzy, s.unmatched,
    );
}

struct StderrLog {
    quiet: bool,
}

impl LogSink for StderrLog {
    fn log(&self, message: &str) {
        if !self.quiet {
            eprintln!("[{}] {}", Local::now().format("%H:%M:%S"), message);
        }
    }
}

struct StderrProgress {
    quiet: bool,
}

impl ProgressSink for StderrProgress {
    fn progress(&self, fraction: f64) {
        if !self.quiet {
            eprintln!("progress: {:.0}%", fraction * 100.0);
        }
    }
}
