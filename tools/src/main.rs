//! score-runner: headless scoring runner for loan default risk.
//!
//! Usage:
//!   score-runner --input upload.csv --output predictions.csv --data-dir ./data
//!   score-runner --generate 500 --seed 12345 --output upload.csv

use anyhow::{Context, Result};
use loan_default_core::{
    config::PipelineConfig,
    pipeline::{ScoringPipeline, ScoringReport},
    sample::SampleGenerator,
    Table,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let output = flag_value(&args, "--output").unwrap_or("predictions.csv");

    if let Some(rows) = flag_value(&args, "--generate") {
        let rows: usize = rows
            .parse()
            .with_context(|| format!("--generate expects a row count, got {rows:?}"))?;
        let seed = parse_arg(&args, "--seed", 42u64);
        let table = SampleGenerator::new(seed).generate(rows)?;
        table.to_csv_path(output)?;
        println!("Wrote {rows} synthetic records (seed {seed}) to {output}");
        return Ok(());
    }

    let input = flag_value(&args, "--input").context("--input <csv> is required")?;
    let config = match flag_value(&args, "--data-dir") {
        Some(dir) => PipelineConfig::load(dir)?,
        None => {
            log::warn!("No --data-dir given; using built-in baseline model");
            PipelineConfig::default_test()
        }
    };

    println!("Default Prediction: score-runner");
    println!("  input:     {input}");
    println!("  output:    {output}");
    println!("  model:     {}", config.model.name);
    println!();

    let upload = Table::from_csv_path(input)?;
    let pipeline = ScoringPipeline::from_config(&config);
    // Schema and parse failures name the offending column or row.
    let report = pipeline
        .run(&upload)
        .with_context(|| format!("Cannot score {input}"))?;

    for line in report.lines() {
        println!("{line}");
    }
    report.export.to_csv_path(output)?;
    print_summary(&report, output);
    Ok(())
}

fn print_summary(report: &ScoringReport, output: &str) {
    let summary = report.summary();
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  input rows:         {}", summary.input_rows);
    println!("  scored rows:        {}", summary.scored_rows);
    println!("  filtered rows:      {}", summary.filtered_rows);
    println!("  predicted defaults: {}", summary.predicted_defaults);
    println!("  export:             {output}");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
