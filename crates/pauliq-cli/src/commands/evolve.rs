//! Evolve command implementation.

use anyhow::Result;
use console::style;

use pauliq_core::EvolutionMethod;
use pauliq_profiles::PauliqConfig;

use super::common::{load_profile, parse_state, print_distribution, state_label};

/// Execute the evolve command.
pub fn execute(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
    state: Option<&str>,
    time: f64,
    method: &str,
    top: usize,
) -> Result<()> {
    if !time.is_finite() {
        anyhow::bail!("--time must be finite, got {time}");
    }
    let method: EvolutionMethod = method.parse().map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut profile = load_profile(config, profile, qubits)?;
    let initial = parse_state(state, profile.num_qubits())?;

    println!(
        "{} Evolving |{}⟩ under {} for t = {} ({})",
        style("→").cyan().bold(),
        state_label(state, profile.num_qubits()),
        style(profile.name()).green(),
        style(time).yellow(),
        method
    );

    let energy_before = profile.compute_energy(Some(&initial))?;
    let evolved = profile
        .hamiltonian_mut()
        .time_evolution_with(&initial, time, method)?;
    let energy_after = profile.compute_energy(Some(&evolved))?;
    let fidelity = initial.fidelity(&evolved)?;

    println!("{} Evolution complete", style("✓").green().bold());
    println!("  Energy:   {energy_before:.6} → {energy_after:.6}");
    println!("  Norm:     {:.12}", evolved.norm());
    println!("  Fidelity with initial state: {fidelity:.6}");
    println!();
    println!("Outcome probabilities:");
    print_distribution(&evolved, top);
    Ok(())
}
