use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aprs_parser::{AprsParser, ParseOptions};

#[derive(Parser, Debug)]
#[command(
    name = "aprs-parser",
    about = "Decode APRS packets, one per line, and print them as JSON."
)]
struct Args {
    /// TOML file with decoder options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Accept destination callsigns that do not follow the callsign grammar
    #[arg(long = "no-destination-validation", default_value_t = false)]
    no_destination_validation: bool,
    /// Pretty-print each JSON document
    #[arg(long, default_value_t = false)]
    pretty: bool,
    /// Input file (default: stdin)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => ParseOptions::load(path)?,
        None => ParseOptions::default(),
    };
    if args.no_destination_validation {
        options.disable_destination_callsign_validation = true;
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let parser = AprsParser::new(options);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut decoded = 0usize;
    let mut failed = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        // APRS-IS server comments and blank lines
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match parser.parse(&line) {
            Ok(packet) => {
                let json = if args.pretty {
                    serde_json::to_string_pretty(&packet)?
                } else {
                    serde_json::to_string(&packet)?
                };
                writeln!(out, "{}", json).context("Failed to write output")?;
                decoded += 1;
            }
            Err(failure) => {
                warn!(line = line_no + 1, raw = %line, error = %failure.error, "Failed to decode packet");
                failed += 1;
            }
        }
    }

    info!(decoded, failed, "Finished decoding");
    Ok(())
}
