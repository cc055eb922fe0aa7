// Declare modules
pub mod cli;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod models;
pub mod planner;
pub mod rng;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::writer::Writer;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration (fails before anything touches the disk)
    let config = resolve_config(args).context("Invalid configuration")?;
    println!("{}\n", OutputGenerator::format_config(&config));

    // 3. Plan
    let plan = planner::plan(&config)?;
    if config.dry_run {
        log::info!("Dry run: no files will be created");
    }

    // 4. Write
    let writer = Writer::new(&config.output_directory, config.dry_run, config.jobs);
    let report = writer.write(&plan)?;

    if !report.failures.is_empty() {
        log::warn!(
            "⚠️ {} of {} files could not be written",
            report.failures.len(),
            report.planned_file_count
        );
    }

    // 5. Print summary to stdout
    println!("{}", OutputGenerator::format_report(&report));

    Ok(())
}
