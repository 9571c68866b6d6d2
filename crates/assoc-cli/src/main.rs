use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use assoc_core::impls::{JsonSink, TextSink};
use assoc_core::{Registry, Sink};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;
mod error;
mod script;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `Create: Player {1,Victor}`
    Text,
    /// JSON Lines
    Json,
}

/// Classify payloads as create / update / send and print what the sink receives.
#[derive(Debug, Parser)]
#[command(name = "assoc", version)]
struct Args {
    /// Output format of the sink (stdout)
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// JSON Lines command script; the built-in demo runs when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log filter, e.g. `assoc_cli=debug,assoc_core=trace` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let result = match args.format {
        Format::Text => run(&args, TextSink::new(io::stdout().lock())),
        Format::Json => run(&args, JsonSink::new(io::stdout().lock())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("assoc_cli=info,assoc_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run<S: Sink>(args: &Args, sink: S) -> Result<(), CliError> {
    let mut registry = Registry::new(sink);
    demo::register(&mut registry);
    info!(payloads = ?registry.registered_payloads(), "registered");

    match &args.script {
        None => demo::run(&mut registry),
        Some(path) => {
            let codec = demo::codec()?;
            let file = File::open(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            let applied = script::apply(BufReader::new(file), &codec, &mut registry)?;
            info!(path = %path.display(), applied, "script finished");
        }
    }
    Ok(())
}
