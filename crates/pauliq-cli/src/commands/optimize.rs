//! Optimize command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use pauliq_learn::{GradientDescent, LearningLog};
use pauliq_profiles::PauliqConfig;

use super::common::{load_profile, parse_state, print_terms, state_label};

/// Execute the optimize command.
pub fn execute(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
    state: Option<&str>,
    target: f64,
    max_iterations: Option<usize>,
    learning_rate: Option<f64>,
) -> Result<()> {
    let mut settings = config.optimizer.clone();
    if let Some(max) = max_iterations {
        settings = settings.with_max_iterations(max);
    }
    if let Some(rate) = learning_rate {
        settings = settings.with_learning_rate(rate);
    }
    let optimizer = GradientDescent::new(settings)?;

    let mut profile = load_profile(config, profile, qubits)?;
    let psi = parse_state(state, profile.num_qubits())?;
    let initial_energy = profile.compute_energy(Some(&psi))?;

    println!(
        "{} Optimizing {} on |{}⟩: {:.6} → target {}",
        style("→").cyan().bold(),
        style(profile.name()).green(),
        state_label(state, profile.num_qubits()),
        initial_energy,
        style(target).yellow()
    );
    println!(
        "  Learning rate {}, up to {} iterations",
        optimizer.config().learning_rate,
        optimizer.config().max_iterations
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Running gradient descent...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let log = LearningLog::new();
    let result = optimizer.optimize_logged(profile.hamiltonian_mut(), &psi, target, Some(&log));
    spinner.finish_and_clear();
    let run = result?;

    let final_energy = profile.compute_energy(Some(&psi))?;
    if run.converged {
        println!(
            "{} Converged in {} iterations",
            style("✓").green().bold(),
            run.iterations_used
        );
    } else {
        println!(
            "{} Did not converge within {} iterations (best error {:.2e})",
            style("!").yellow().bold(),
            run.iterations_used,
            run.best_error
        );
    }
    println!(
        "  Energy: {initial_energy:.6} → {}",
        style(format!("{final_energy:.6}")).yellow().bold()
    );
    println!("  Final error: {:.2e}", run.final_error);
    println!("  Snapshots logged: {}", log.snapshots().len());
    println!();
    println!("Optimized coefficients:");
    print_terms(profile.hamiltonian());
    Ok(())
}
