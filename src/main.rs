use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use score_sheet::open_spreadsheet;
use score_sheet::render_entry_table;
use score_sheet::ExtractConfig;
use score_sheet::ExtractionMeta;
use score_sheet::Extractor;
use score_sheet::Record;
use score_sheet::ScoreSheetError;
use score_sheet::SheetFilter;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "score-sheet")]
#[command(about = "Extracts student score records from grade spreadsheets", version)]
struct Args {
    /// Workbook to read (.xlsx or .xlsm)
    #[arg(short, long)]
    excel: String,

    /// Glob pattern selecting sheets; the first sheet when omitted
    #[arg(short, long)]
    sheet: Option<String>,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// TOML file overriding keywords and limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Class used when the sheet names none
    #[arg(long)]
    default_class: Option<String>,

    /// Course used when the sheet names none
    #[arg(long)]
    default_course: Option<String>,

    /// Also print the name | usual | exam entry table of every sheet that passed
    #[arg(long)]
    task: bool,
}

#[derive(Serialize)]
struct Output {
    sheets: Vec<SheetOutput>,
}

#[derive(Serialize)]
struct SheetOutput {
    sheet: String,
    meta: Option<ExtractionMeta>,
    grades: Vec<Record>,
    ok: bool,
    diagnostic: Option<String>,
}

/// How the run ended, from best to worst.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Outcome {
    Passed,
    GateFailed,
    Structural,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("score_sheet=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(Outcome::Passed) => ExitCode::SUCCESS,
        Ok(Outcome::GateFailed) => ExitCode::from(1),
        Ok(Outcome::Structural) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };
    if args.default_class.is_some() {
        config.default_class = args.default_class.clone();
    }
    if args.default_course.is_some() {
        config.default_course = args.default_course.clone();
    }
    let extractor = Extractor::new(config);

    let mut workbook = open_spreadsheet(&args.excel)?;
    let sheet_names = match &args.sheet {
        Some(pattern) => SheetFilter::new(&[pattern])?.select(workbook.sheet_names()),
        None => workbook.sheet_names().into_iter().take(1).collect(),
    };
    if sheet_names.is_empty() {
        anyhow::bail!("No sheet of '{}' matches '{}'", args.excel, args.sheet.as_deref().unwrap_or("*"));
    }

    let mut outcome = Outcome::Passed;
    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        info!("Reading sheet '{}' of '{}'", sheet_name, args.excel);
        let grid = workbook.read_sheet(&sheet_name)?;
        let output = match extractor.extract(&grid, &sheet_name) {
            Ok(extraction) => {
                let verdict = extraction.validate();
                if let Err(gate) = &verdict {
                    warn!("Sheet '{}' failed validation: {}", sheet_name, gate);
                    outcome = outcome.max(Outcome::GateFailed);
                }
                SheetOutput {
                    sheet: sheet_name,
                    ok: verdict.is_ok(),
                    diagnostic: verdict.err().map(|gate| gate.to_string()),
                    grades: extraction.records,
                    meta: Some(extraction.meta),
                }
            }
            Err(e @ ScoreSheetError::NameHeaderNotFound { .. }) => {
                error!("Sheet '{}': {}", sheet_name, e);
                outcome = outcome.max(Outcome::Structural);
                SheetOutput { sheet: sheet_name, meta: None, grades: Vec::new(), ok: false, diagnostic: Some(e.to_string()) }
            }
            Err(e) => return Err(e.into()),
        };
        sheets.push(output);
    }

    let output = Output { sheets };
    let json = serde_json::to_string_pretty(&output)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    if args.task {
        for sheet in output.sheets.iter().filter(|sheet| sheet.ok) {
            println!("{}", render_entry_table(&sheet.grades));
        }
    }
    Ok(outcome)
}
