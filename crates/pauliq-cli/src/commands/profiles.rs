//! Profiles command implementation.

use anyhow::Result;
use console::style;

use pauliq_profiles::{PauliqConfig, ProfileRegistry};

/// Execute the profiles command.
pub fn execute(config: &PauliqConfig) -> Result<()> {
    let registry = ProfileRegistry::with_defaults();
    let default = registry.resolve(&config.default_profile)?;

    println!("{} Available profiles:\n", style("pauliq").cyan().bold());

    for strategy in registry.iter() {
        let name = strategy.name();
        let aliases = registry.aliases_of(name);
        println!(
            "  {} {}{}",
            if name == default {
                style("●").green()
            } else {
                style("○").dim()
            },
            style(name).bold(),
            if aliases.is_empty() {
                String::new()
            } else {
                format!(" ({})", aliases.join(", "))
            }
        );
        println!("    {}", strategy.motif());
    }

    println!();
    println!(
        "  Default: {} on {} qubits",
        style(default).yellow(),
        config.num_qubits
    );
    Ok(())
}
