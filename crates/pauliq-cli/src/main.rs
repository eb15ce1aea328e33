//! pauliq command-line interface
//!
//! Inspect profile Hamiltonians, compute energies and ground states, evolve
//! states in time, and fit coefficients from the terminal.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use pauliq_profiles::PauliqConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compare, energy, evolve, ground, learn, optimize, profiles, show, version};

/// pauliq - Pauli-string Hamiltonians, energies and time evolution
#[derive(Parser)]
#[command(name = "pauliq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.pauliq/config.yaml if present)
    #[arg(long, global = true, env = "PAULIQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available profiles, their aliases and motifs
    Profiles,

    /// Print the terms of a profile Hamiltonian
    Show {
        /// Profile name or alias
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Also propose an additional term
        #[arg(long)]
        suggest: bool,
    },

    /// Expectation value of a basis state
    Energy {
        /// Profile name or alias
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Basis state as a bitstring, e.g. 0101 (defaults to all zeros)
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Ground-state energy, spectral gap and dominant amplitudes
    Ground {
        /// Profile name or alias
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Number of amplitudes to show
        #[arg(long, default_value = "8")]
        top: usize,
    },

    /// Evolve a basis state under a profile Hamiltonian
    Evolve {
        /// Profile name or alias
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Initial basis state (defaults to all zeros)
        #[arg(short, long)]
        state: Option<String>,

        /// Evolution time
        #[arg(short, long, allow_hyphen_values = true)]
        time: f64,

        /// Evolution method (spectral, expm)
        #[arg(short, long, default_value = "spectral")]
        method: String,

        /// Number of outcome probabilities to show
        #[arg(long, default_value = "8")]
        top: usize,
    },

    /// Energy of one state under every profile
    Compare {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Basis state (defaults to all zeros)
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Tune profile coefficients toward a target energy
    Optimize {
        /// Profile name or alias
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Basis state (defaults to all zeros)
        #[arg(short, long)]
        state: Option<String>,

        /// Target energy
        #[arg(short, long, allow_hyphen_values = true)]
        target: f64,

        /// Iteration budget (overrides config)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Learning rate (overrides config)
        #[arg(long)]
        learning_rate: Option<f64>,
    },

    /// Fit coefficients to measured energies
    Learn {
        /// JSON file with [{"state": "01", "energy": -0.3}, ...]
        #[arg(short, long)]
        input: PathBuf,

        /// Write the fitted Hamiltonian and run as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let result = PauliqConfig::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| {
            init_logging(cli.verbose, &config.log_level);
            run(cli.command, &config)
        });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, config: &PauliqConfig) -> anyhow::Result<()> {
    match command {
        Commands::Profiles => profiles::execute(config),

        Commands::Show {
            profile,
            qubits,
            suggest,
        } => show::execute(config, profile.as_deref(), qubits, suggest),

        Commands::Energy {
            profile,
            qubits,
            state,
        } => energy::execute(config, profile.as_deref(), qubits, state.as_deref()),

        Commands::Ground {
            profile,
            qubits,
            top,
        } => ground::execute(config, profile.as_deref(), qubits, top),

        Commands::Evolve {
            profile,
            qubits,
            state,
            time,
            method,
            top,
        } => evolve::execute(
            config,
            profile.as_deref(),
            qubits,
            state.as_deref(),
            time,
            &method,
            top,
        ),

        Commands::Compare { qubits, state } => compare::execute(config, qubits, state.as_deref()),

        Commands::Optimize {
            profile,
            qubits,
            state,
            target,
            max_iterations,
            learning_rate,
        } => optimize::execute(
            config,
            profile.as_deref(),
            qubits,
            state.as_deref(),
            target,
            max_iterations,
            learning_rate,
        ),

        Commands::Learn { input, output } => learn::execute(&input, output.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
