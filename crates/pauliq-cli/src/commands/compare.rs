//! Compare command implementation.

use anyhow::Result;
use console::style;

use pauliq_profiles::{PauliqConfig, ProfileManager, ProfileRegistry};

use super::common::{parse_state, resolve_qubits, state_label};

/// Execute the compare command.
pub fn execute(config: &PauliqConfig, qubits: Option<usize>, state: Option<&str>) -> Result<()> {
    let n = resolve_qubits(config, qubits)?;
    let psi = parse_state(state, n)?;
    let mut manager = ProfileManager::new(
        ProfileRegistry::with_defaults(),
        &config.default_profile,
        n,
        config.profile_params.clone(),
    )?;

    println!(
        "{} Comparing |{}⟩ across {} profiles\n",
        style("→").cyan().bold(),
        state_label(state, n),
        manager.list_profiles().len()
    );

    let energies = manager.compare_profiles(Some(&psi))?;
    let lowest = energies
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(name, _)| name.clone());

    let width = energies.keys().map(String::len).max().unwrap_or(0);
    for (name, energy) in &energies {
        let marker = if Some(name) == lowest.as_ref() {
            style("★").yellow()
        } else {
            style(" ").dim()
        };
        let padded = format!("{name:<width$}");
        println!("  {marker} {}  {energy:>12.6}", style(padded).bold());
    }
    Ok(())
}
