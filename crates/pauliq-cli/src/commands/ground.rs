//! Ground command implementation.

use anyhow::Result;
use console::style;

use pauliq_profiles::PauliqConfig;

use super::common::{load_profile, print_distribution};

/// Execute the ground command.
pub fn execute(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
    top: usize,
) -> Result<()> {
    let mut profile = load_profile(config, profile, qubits)?;

    println!(
        "{} Diagonalizing {} ({} × {})",
        style("→").cyan().bold(),
        style(profile.name()).green(),
        profile.hamiltonian().dim(),
        profile.hamiltonian().dim()
    );

    let ground = profile.ground_state()?;
    let gap = profile.hamiltonian_mut().spectral_gap();
    let spectrum = profile.hamiltonian_mut().spectrum();

    println!("{} Ground state found", style("✓").green().bold());
    println!(
        "  Energy:       {}",
        style(format!("{:.6}", ground.energy)).yellow().bold()
    );
    println!("  Spectral gap: {gap:.6}");
    if let Some(max) = spectrum.last() {
        println!("  Spectrum:     [{:.4}, {max:.4}]", ground.energy);
    }
    println!();
    println!("Dominant amplitudes:");
    print_distribution(&ground.state, top);
    Ok(())
}
