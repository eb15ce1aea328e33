//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Pauli-string Hamiltonians, energies and time evolution",
        style("pauliq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  pauliq-core      Pauli algebra, matrix cache, energies and evolution");
    println!("  pauliq-learn     Finite-difference gradients and coefficient fitting");
    println!("  pauliq-profiles  Named Hamiltonian profiles and configuration");
    println!("  pauliq-cli       Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
