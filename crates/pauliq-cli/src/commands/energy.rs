//! Energy command implementation.

use anyhow::Result;
use console::style;

use pauliq_profiles::PauliqConfig;

use super::common::{load_profile, parse_state, state_label};

/// Execute the energy command.
pub fn execute(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
    state: Option<&str>,
) -> Result<()> {
    let mut profile = load_profile(config, profile, qubits)?;
    let psi = parse_state(state, profile.num_qubits())?;
    let energy = profile.compute_energy(Some(&psi))?;

    println!(
        "{} |{}⟩ under {}",
        style("→").cyan().bold(),
        state_label(state, profile.num_qubits()),
        style(profile.name()).green()
    );
    println!("  Energy: {}", style(format!("{energy:.6}")).yellow().bold());
    Ok(())
}
