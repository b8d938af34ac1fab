// resift CLI - clean a dump export against a report snapshot

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use resift_recon::model::DiagnosticLevel;
use resift_recon::{Dataset, ReconConfig, ReconError};

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "resift")]
#[command(about = "Reconcile a dump export against a report snapshot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a dump file against a report file
    #[command(after_help = "\
Keeps dump rows newer than the report's latest 'Created On', plus older rows
whose ParentID the report knows. 'Change' rows must also match a report entry
at the exact same timestamp when both files carry a 'Record Type' column.

Examples:
  resift clean report.xlsx dump.xlsx
  resift clean report.xlsx dump.csv --output cleaned.csv
  resift clean report.xlsx dump.xlsx --config columns.toml --json
  resift clean report.xlsx dump.xlsx --report-sheet Data --dump-sheet Export")]
    Clean {
        /// Report file (xlsx/xls/ods/csv/tsv)
        report: PathBuf,

        /// Dump file (xlsx/xls/ods/csv/tsv)
        dump: PathBuf,

        /// Output file; format follows the extension
        /// (default: cleaned_dump.xlsx beside the dump)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Worksheet holding the report data (Excel input only)
        #[arg(long, default_value = "Data")]
        report_sheet: String,

        /// Worksheet holding the dump data (Excel input only; default first sheet)
        #[arg(long)]
        dump_sheet: Option<String>,

        /// TOML file overriding column names / timestamp format
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List the columns and row count of a spreadsheet file
    #[command(after_help = "\
Examples:
  resift inspect dump.xlsx
  resift inspect report.xlsx --sheet Data")]
    Inspect {
        /// File to inspect (xlsx/xls/ods/csv/tsv)
        file: PathBuf,

        /// Worksheet to read (Excel input only; default first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            report,
            dump,
            output,
            report_sheet,
            dump_sheet,
            config,
            json,
        } => cmd_clean(report, dump, output, report_sheet, dump_sheet, config, json),
        Commands::Inspect { file, sheet } => cmd_inspect(file, sheet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    fn engine(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumns { .. } => {
                Some("run `resift inspect <file>` to list available columns".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

fn cmd_clean(
    report_path: PathBuf,
    dump_path: PathBuf,
    output: Option<PathBuf>,
    report_sheet: String,
    dump_sheet: Option<String>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| CliError {
                code: EXIT_CONFIG,
                message: format!("cannot read config {}: {e}", path.display()),
                hint: None,
            })?;
            ReconConfig::from_toml(&text).map_err(CliError::engine)?
        }
        None => ReconConfig::default(),
    };

    let report = load_dataset(
        &report_path,
        "report",
        Some(&report_sheet),
        &config.timestamp_format,
    )?;
    let dump = load_dataset(
        &dump_path,
        "dump",
        dump_sheet.as_deref(),
        &config.timestamp_format,
    )?;

    let result = resift_recon::reconcile(&config, &report, &dump).map_err(CliError::engine)?;

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Info => eprintln!("info: {}", d.message),
            DiagnosticLevel::Warning => eprintln!("warning: {}", d.message),
        }
    }

    let s = &result.summary;
    let change_note = match s.removed_unmatched_change {
        Some(n) => format!("{n} unmatched change row(s) removed"),
        None => "change cross-check skipped".to_string(),
    };
    eprintln!(
        "cleaned dump: {} of {} row(s) kept; {} unmatched-parent row(s) removed, {} new row(s) after horizon, {}",
        s.cleaned_rows, s.dump_rows, s.removed_unmatched_parent, s.new_after_horizon, change_note,
    );

    let output_path = output
        .unwrap_or_else(|| dump_path.with_file_name("cleaned_dump.xlsx"));
    write_dataset(&result.cleaned, &output_path)?;
    eprintln!("wrote {}", output_path.display());

    if json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    Ok(())
}

fn cmd_inspect(path: PathBuf, sheet: Option<String>) -> Result<(), CliError> {
    // Format string only matters for date-typed Excel cells; the default is
    // fine for a column listing.
    let config = ReconConfig::default();
    let dataset = load_dataset(&path, "file", sheet.as_deref(), &config.timestamp_format)?;

    println!(
        "{}: {} column(s), {} row(s)",
        path.display(),
        dataset.columns.len(),
        dataset.len(),
    );
    for column in &dataset.columns {
        println!("  {column}");
    }
    Ok(())
}

fn is_excel(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods")
    )
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn load_dataset(
    path: &Path,
    name: &str,
    sheet: Option<&str>,
    timestamp_format: &str,
) -> Result<Dataset, CliError> {
    if is_excel(path) {
        resift_io::xlsx::import(path, name, sheet, timestamp_format).map_err(CliError::io)
    } else {
        resift_io::csv::import(path, name).map_err(CliError::io)
    }
}

fn write_dataset(dataset: &Dataset, path: &Path) -> Result<(), CliError> {
    match extension(path).as_deref() {
        Some("xlsx") => {
            resift_io::xlsx::export(dataset, path, "CleanedDump").map_err(CliError::io)
        }
        Some("tsv") => resift_io::csv::export(dataset, path, b'\t').map_err(CliError::io),
        Some("csv") => resift_io::csv::export(dataset, path, b',').map_err(CliError::io),
        other => Err(CliError {
            code: EXIT_USAGE,
            message: format!(
                "unsupported output extension {:?} (expected xlsx, csv, or tsv)",
                other.unwrap_or("")
            ),
            hint: None,
        }),
    }
}
