extern crate anyhow;
extern crate clap;
extern crate serde;
extern crate serde_json;
extern crate thiserror;
extern crate voxell_rng;

use std::process::ExitCode;

use crate::cli::{Cli, corrupt::RunReport};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod engine;
mod error;
mod method;
mod rng;
mod store;


fn main() -> ExitCode {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Cli::parse();
    match cli::corrupt::corrupt(&args) {
        Ok(report) => {
            println!("Corruption completed successfully!");
            println!("{}", summary(&report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(event = "run_failed", error = %e, "corruption aborted");
            eprintln!("An error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn summary(report: &RunReport) -> String {
    let result = &report.result;
    let mut line = format!(
        "\t{} bytes corrupted in {} of {} chunks over offsets {}..={} ({} bytes), seed {}",
        result.bytes_mutated,
        result.strides_selected,
        result.strides,
        result.span.start,
        result.span.end,
        result.span.len(),
        report.seed,
    );
    if let Some(backup) = &report.backup {
        line.push_str(&format!("\n\toriginal saved to {}", backup.display()));
    }
    if let Some(log_file) = &report.log_file {
        line.push_str(&format!("\n\tlog written to {}", log_file.display()));
    }
    line
}
