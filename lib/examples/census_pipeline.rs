//! Run the stacked naive Bayes + random forest pipeline on a delimited file.
//!
//! ```text
//! cargo run --example census_pipeline -- census.csv ,
//! cargo run --example census_pipeline -- --config experiment.toml
//! ```
//!
//! The file needs a header row and a numeric `target` column; every other
//! column is used as a feature. The report is printed to stdout as JSON.
//! Set `RUST_LOG=debug` for per-stage detail.

use stackforest::{run_experiment, ExperimentConfig};
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str = "usage: census_pipeline <path> <separator> | --config <file.toml>";

fn parse_args(args: &[String]) -> Result<ExperimentConfig, Box<dyn Error>> {
    match args {
        [flag, path] if flag == "--config" => Ok(ExperimentConfig::from_toml_file(path)?),
        [path, separator] => {
            let separator = match separator.as_str() {
                "\\t" | "tab" => '\t',
                s => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => return Err(format!("separator must be one character, got {:?}", s).into()),
                    }
                }
            };
            Ok(ExperimentConfig::new(path, separator))
        }
        _ => Err(USAGE.into()),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    let report = run_experiment(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
