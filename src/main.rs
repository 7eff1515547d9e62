//! resbundle - pack a package's resource directory into its binary
//!
//! For every package given, archives `<package>/bundle` and writes it as a
//! Rust byte array to `<package>/src/bundle.rs`.

use anyhow::Result;
use clap::Parser;
use resbundle::bundle::{PackResult, Packer};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resbundle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write the compressed archive to this file instead of the package's bundle.rs
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Package directories to process
    #[arg(required = true, value_name = "PACKAGE")]
    packages: Vec<PathBuf>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let packer = Packer::new(cli.file);
    let results = packer.pack_all(&cli.packages)?;

    let written = results
        .iter()
        .filter(|r| matches!(r, PackResult::Written(_)))
        .count();
    info!("Packed {} of {} packages", written, results.len());

    for result in results {
        match result {
            PackResult::Written(path) => println!("✓ {}", path.display()),
            PackResult::SkippedLibrary(name) => println!("- {} (not a binary package)", name),
        }
    }

    Ok(())
}
