//! Learn command implementation.
//!
//! `pauliq learn --input measurements.json [--output fitted.json]`

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};

use pauliq_core::{Hamiltonian, QuantumState};
use pauliq_learn::{Measurement, OptimizationRun, learn_from_measurements};

use super::common::print_terms;

/// One line of the input file.
#[derive(Debug, Deserialize)]
struct MeasurementRecord {
    state: String,
    energy: f64,
}

/// Written to `--output`.
#[derive(Debug, Serialize)]
struct FitReport<'a> {
    hamiltonian: &'a Hamiltonian,
    run: &'a OptimizationRun,
}

/// Read `(bitstring, energy)` records from a JSON array.
fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let records: Vec<MeasurementRecord> = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse measurements: {}", path.display()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| -> Result<Measurement> {
            let state = QuantumState::from_bitstring(&record.state)
                .with_context(|| format!("Record {i}: invalid state '{}'", record.state))?;
            Ok(Measurement::new(state, record.energy))
        })
        .collect()
}

/// Execute the learn command.
pub fn execute(input: &Path, output: Option<&Path>) -> Result<()> {
    let measurements = load_measurements(input)?;
    println!(
        "{} Fitting {} measurements from {}",
        style("→").cyan().bold(),
        measurements.len(),
        style(input.display()).green()
    );

    let (hamiltonian, run) = learn_from_measurements(&measurements, None)?;

    if run.converged {
        println!(
            "{} Fit converged in {} iterations",
            style("✓").green().bold(),
            run.iterations_used
        );
    } else {
        println!(
            "{} Fit stopped after {} iterations",
            style("!").yellow().bold(),
            run.iterations_used
        );
    }
    println!("  RMS residual: {:.2e}", run.final_error);
    println!();
    print_terms(&hamiltonian);

    if let Some(path) = output {
        let report = FitReport {
            hamiltonian: &hamiltonian,
            run: &run,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        println!();
        println!("  Output: {}", style(path.display()).green());
    }
    Ok(())
}
