//! polyforge - Hide a payload inside a PDF as invisible text
//!
//! A command line tool that reads a host PDF and a payload file and writes
//! a polyglot: a PDF that still renders as before and also carries the
//! payload bytes in a hidden content stream.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use polyforge_core::api::{
    GenStatus, GenerationReport, InjectOptions, InvisibleTextGenerator, PayloadEncoding,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Hide a payload inside a PDF as invisible text.
#[derive(Parser, Debug)]
#[command(name = "polyforge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host PDF file
    host: PathBuf,

    /// File whose bytes are hidden in the host
    payload: PathBuf,

    /// Where to write the polyglot
    output: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Preferred resource name for the injected font
    #[arg(long = "font-name", default_value = "Font124573")]
    font_name: String,

    /// Standard base font for the injected font dictionary
    #[arg(long = "base-font", default_value = "Times-Roman")]
    base_font: String,

    /// Text size of the hidden payload
    #[arg(long = "font-size", default_value_t = 24.0)]
    font_size: f32,

    /// Backslash-escape the payload instead of writing it verbatim
    #[arg(long = "escape-payload", action = ArgAction::SetTrue)]
    escape_payload: bool,

    /// Print a JSON generation report to stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = if debug {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<bool> {
    let host = fs::read(&args.host)
        .with_context(|| format!("reading host {}", args.host.display()))?;
    let payload = fs::read(&args.payload)
        .with_context(|| format!("reading payload {}", args.payload.display()))?;

    let encoding = if args.escape_payload {
        PayloadEncoding::Escaped
    } else {
        PayloadEncoding::Verbatim
    };
    let options = InjectOptions::default()
        .font_name(&args.font_name)
        .base_font(&args.base_font)
        .font_size(args.font_size)
        .payload_encoding(encoding);
    let generator = InvisibleTextGenerator::new(options);

    let (report, output) = GenerationReport::run(
        &generator,
        &args.host,
        &host,
        &args.payload,
        &payload,
        &args.output,
    );

    if let Some(output) = output {
        if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&args.output, &output)
            .with_context(|| format!("writing {}", args.output.display()))?;
        info!(output = %args.output.display(), bytes = output.len(), "Wrote polyglot");
    }

    if args.json {
        println!("{}", report.to_json()?);
    }

    match (&report.status, &report.error) {
        (GenStatus::Error, Some(err)) => {
            error!(host = %args.host.display(), "{err}");
            if !args.json {
                eprintln!("Error: {err}");
            }
            Ok(false)
        }
        _ => Ok(true),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
