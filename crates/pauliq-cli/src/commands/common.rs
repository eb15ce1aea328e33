//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use pauliq_core::{Hamiltonian, MAX_QUBITS, QuantumState};
use pauliq_profiles::{PauliqConfig, Profile, ProfileRegistry};

/// Register size from `--qubits`, or the configured default.
pub fn resolve_qubits(config: &PauliqConfig, qubits: Option<usize>) -> Result<usize> {
    let n = qubits.unwrap_or(config.num_qubits);
    if n == 0 || n > MAX_QUBITS {
        anyhow::bail!("--qubits must be between 1 and {MAX_QUBITS}, got {n}");
    }
    Ok(n)
}

/// Instantiate a profile by name or alias, falling back to the configured
/// default profile and register size.
pub fn load_profile(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
) -> Result<Profile> {
    let name = profile.unwrap_or(&config.default_profile);
    let n = resolve_qubits(config, qubits)?;
    let registry = ProfileRegistry::with_defaults();
    let strategy = registry.get(name)?;
    debug!(profile = strategy.name(), num_qubits = n, "building profile");
    Profile::from_strategy(strategy.as_ref(), n, &config.profile_params)
        .with_context(|| format!("Failed to build profile '{name}' on {n} qubits"))
}

/// Parse a basis-state bitstring; `None` means all zeros.
pub fn parse_state(bits: Option<&str>, num_qubits: usize) -> Result<QuantumState> {
    let Some(bits) = bits else {
        return Ok(QuantumState::zero(num_qubits)?);
    };
    if bits.len() != num_qubits {
        anyhow::bail!(
            "State '{bits}' has {} qubits, expected {num_qubits}",
            bits.len()
        );
    }
    QuantumState::from_bitstring(bits).with_context(|| format!("Invalid state '{bits}'"))
}

/// Display label for a `--state` argument.
pub fn state_label(bits: Option<&str>, num_qubits: usize) -> String {
    bits.map_or_else(|| "0".repeat(num_qubits), str::to_string)
}

/// Print every term of a Hamiltonian, one per line.
pub fn print_terms(hamiltonian: &Hamiltonian) {
    for (i, term) in hamiltonian.terms().iter().enumerate() {
        let coefficient = format!("{:+.4}", term.coefficient);
        println!(
            "  {:>3}  {}  {}",
            style(i).dim(),
            if term.coefficient < 0.0 {
                style(coefficient).red()
            } else {
                style(coefficient).green()
            },
            style(&term.pauli).cyan()
        );
    }
}

/// Print the `top` most probable basis states of `state`.
pub fn print_distribution(state: &QuantumState, top: usize) {
    let probabilities = state.probabilities();
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

    for &index in order.iter().take(top) {
        let prob = probabilities[index] * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);
        let amplitude = state.amplitude(index).unwrap_or_default();

        println!(
            "  {}: {:>+8.4}{:>+8.4}i ({:>6.2}%) {}",
            style(state.basis_label(index)).cyan(),
            amplitude.re,
            amplitude.im,
            prob,
            style(bar).green()
        );
    }

    if order.len() > top {
        println!("  ... and {} more basis states", order.len() - top);
    }
}
