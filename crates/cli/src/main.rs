//! CLI tool for extracting titles, text and images from presentations.

mod dispatch;

use anyhow::{Context, Result};
use clap::Parser;
use dispatch::{run, ExtractConfig};
use std::path::{Path, PathBuf};

/// Extract slide titles, body text and images from PPTX and PDF files.
#[derive(Parser, Debug)]
#[command(name = "slidex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input presentation file(s) (.pptx or .pdf)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Directory to create `<name>_output/` in (default: current directory)
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Also print the JSON record to stdout
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut failed = 0usize;

    for input_path in &args.input {
        match process_file(input_path, &args) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.input.len());
    }

    Ok(())
}

/// Extract a single presentation file.
fn process_file(input_path: &Path, args: &Args) -> Result<()> {
    if args.verbose {
        eprintln!("Processing: {}", input_path.display());
    }

    let mut config = ExtractConfig::new(input_path);
    if let Some(root) = &args.output_root {
        config = config.with_output_root(root);
    }

    let report = run(&config).with_context(|| format!("Failed to extract {}", input_path.display()))?;

    for failure in &report.failures {
        eprintln!(
            "  Skipped {} on slide {}: {}",
            failure.filename, failure.unit, failure.reason
        );
    }

    if args.verbose {
        eprintln!("  Found {} slides", report.record.slides.len());
        eprintln!("  Record written to {}", report.json_path.display());
    }

    if args.print {
        let json = slidex_core::serialize::to_json_string(&report.record)
            .context("Failed to encode record")?;
        println!("{}", json);
    }

    println!("Data saved to: {}", report.output_dir.display());

    Ok(())
}
