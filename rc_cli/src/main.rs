//! # rc_check
//!
//! Command-line front end for the beam section checks. Reads a JSON batch
//! request from `--input` (or stdin) and writes JSON to stdout:
//!
//! - `calc`: one result record per row
//! - `report`: text report of the first row
//! - `export`: `.xlsx` workbook written to `--output`, then `{"success": true, "file": ...}`
//!
//! In `calc` and `report` modes `--output` also saves the JSON to a file.
//!
//! Logs go to stderr; set `RUST_LOG=rc_core=debug` for per-row detail.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{error, info};

use rc_core::batch::{evaluate_batch, BatchRequest};
use rc_core::codes::{DesignCode, Exposure};
use rc_core::errors::{CalcError, CalcResult};
use rc_core::file_io::{save_bytes, save_json};
use rc_core::report::{build_workbook, first_row_report};

/// Default workbook file name in the temp directory
const DEFAULT_EXPORT_NAME: &str = "Calc_As_Output.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Calc,
    Report,
    Export,
}

#[derive(Debug, Parser)]
#[command(name = "rc_check", version, about = "Reinforced concrete beam section check")]
struct Args {
    /// What to produce
    #[arg(long, value_enum, default_value_t = Mode::Calc)]
    mode: Mode,

    /// Request file; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file: the workbook in export mode, a JSON copy otherwise
    #[arg(long)]
    output: Option<PathBuf>,

    /// Design code, overriding the request (kci-basic, kci-2012, kds-24)
    #[arg(long)]
    code: Option<DesignCode>,

    /// Crack control exposure, overriding the request (dry, normal, severe)
    #[arg(long)]
    exposure: Option<Exposure>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "rc_core=warn,rc_check=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            print_json(&output, args.pretty);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            print_json(&json!([{ "error": e.to_string() }]), args.pretty);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> CalcResult<serde_json::Value> {
    let mut request = read_request(args.input.as_deref())?;
    if let Some(code) = args.code {
        request = request.with_code(code);
    }
    if let Some(exposure) = args.exposure {
        request.settings.exposure = exposure;
    }
    info!(mode = ?args.mode, rows = request.rows.len(), code = %request.settings.code, "request loaded");

    let output = match args.mode {
        Mode::Calc => serde_json::to_value(evaluate_batch(&request))?,
        Mode::Report => {
            if request.rows.is_empty() {
                json!({ "error": "No rows provided" })
            } else {
                let today = chrono::Local::now().date_naive();
                match first_row_report(&request, today) {
                    Ok(report) => serde_json::to_value(report)?,
                    Err(e) => json!({ "error": e.to_string() }),
                }
            }
        }
        Mode::Export => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_EXPORT_NAME));
            let workbook = build_workbook(&request);
            save_bytes(&workbook.to_xlsx()?, &path)?;
            info!(path = %path.display(), sheets = workbook.sheets.len(), "workbook written");
            return Ok(json!({ "success": true, "file": path.display().to_string() }));
        }
    };

    if let Some(path) = &args.output {
        save_json(&output, path)?;
    }
    Ok(output)
}

fn read_request(input: Option<&Path>) -> CalcResult<BatchRequest> {
    match input {
        Some(path) => rc_core::file_io::load_request(path),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
            BatchRequest::from_json(&raw)
        }
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => println!("[{{\"error\": \"{}\"}}]", e),
    }
}
