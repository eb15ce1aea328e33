//! Show command implementation.

use anyhow::Result;
use console::style;

use pauliq_learn::suggest_term;
use pauliq_profiles::PauliqConfig;

use super::common::{load_profile, print_terms};

/// Execute the show command.
pub fn execute(
    config: &PauliqConfig,
    profile: Option<&str>,
    qubits: Option<usize>,
    suggest: bool,
) -> Result<()> {
    let mut profile = load_profile(config, profile, qubits)?;

    println!(
        "{} {} ({})",
        style("→").cyan().bold(),
        style(profile.name()).green(),
        profile.motif()
    );
    println!(
        "  {} qubits, {} terms, dimension {}",
        profile.num_qubits(),
        profile.hamiltonian().n_terms(),
        profile.hamiltonian().dim()
    );
    println!(
        "  Coefficient norm λ = {}",
        style(format!("{:.4}", profile.hamiltonian().lambda())).yellow()
    );
    println!();
    print_terms(profile.hamiltonian());

    let hermitian = profile.hamiltonian_mut().is_hermitian(1e-10);
    println!();
    println!(
        "  Hermitian: {}",
        if hermitian {
            style("yes").green()
        } else {
            style("no").red()
        }
    );

    if suggest {
        let existing: Vec<_> = profile
            .hamiltonian()
            .terms()
            .iter()
            .map(|t| t.pauli.clone())
            .collect();
        let term = suggest_term(profile.num_qubits(), &existing, &mut rand::thread_rng())?;
        println!("  Suggested term: {}", style(term).cyan());
    }

    Ok(())
}
