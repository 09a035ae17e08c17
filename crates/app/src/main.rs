//! flagcodec: compile a command registry into a masked broadcast-flag codec.
//!
//! Pipeline: registry -> codec (headers, mask) -> emitted source -> file or
//! stdout. The layout report goes to stdout when source is written to a
//! file, to stderr otherwise.

mod config;
mod sample;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Config};
use flagcodec_core::{emit, LayoutReport};
use std::io::Write;
use tracing::{info, Level};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::from_args(args)?;
    if config.print_config {
        config.print();
    }

    let codec = config
        .builder()
        .build()
        .with_context(|| format!("failed to compile registry {}", config.source))?;
    let source = emit(&codec, &config.target)
        .with_context(|| format!("failed to emit {} source", config.target.name()))?;

    match &config.out {
        Some(path) => {
            std::fs::write(path, &source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = source.len(), "wrote generated source");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(source.as_bytes())
                .context("failed to write generated source")?;
            stdout.flush()?;
        }
    }

    if config.print_report {
        let report = LayoutReport::new(&codec);
        if config.out.is_some() {
            report.print_summary();
        } else {
            eprint!("{report}");
        }
    }

    Ok(())
}
