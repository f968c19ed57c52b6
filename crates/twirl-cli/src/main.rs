//! Twirl Command-Line Interface
//!
//! The main entry point for the `twirl` tool: generate and inspect Pauli
//! twirling registries, and apply randomized twirling to circuits.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use twirl_core::TwirlConfig;

mod commands;

use commands::{apply, gates, generate, show, version};

/// Twirl - Pauli twirling for quantum circuits
#[derive(Parser)]
#[command(name = "twirl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "TWIRL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate twirling sets and save them as a registry
    Generate {
        /// Gates to generate (comma-separated, defaults to the standard catalogue)
        #[arg(short, long, value_delimiter = ',')]
        gates: Vec<String>,

        /// Output registry file (defaults to the configured registry path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Relative equivalence tolerance
        #[arg(long)]
        tolerance: Option<f64>,

        /// Evaluate candidates on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Show the twirling set of one gate
    Show {
        /// Gate name
        gate: String,

        /// Registry file (generated in memory if absent)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Omit phase corrections
        #[arg(long)]
        no_phase: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Twirl the gates of a circuit
    Apply {
        /// Gates to twirl (comma-separated, twirled in the order given)
        #[arg(short, long, value_delimiter = ',', required = true)]
        gate: Vec<String>,

        /// Input circuit (JSON snapshot)
        #[arg(short, long, conflicts_with = "demo")]
        input: Option<PathBuf>,

        /// Built-in demo circuit (ghz, bell)
        #[arg(long)]
        demo: Option<String>,

        /// Number of qubits for the demo circuit
        #[arg(short, long, default_value = "5")]
        qubits: u32,

        /// Seed for reproducible twirling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Registry file (generated in memory if absent)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Output file (JSON snapshot)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List gates of the standard catalogue
    Gates,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = TwirlConfig::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| run(cli.command, config));

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Commands, mut config: TwirlConfig) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            gates,
            output,
            tolerance,
            sequential,
        } => {
            if let Some(tolerance) = tolerance {
                config.tolerance = tolerance;
            }
            if sequential {
                config.parallel = false;
            }
            config.validate()?;
            generate::execute(&gates, output.as_deref(), &config)
        }

        Commands::Show {
            gate,
            registry,
            no_phase,
            format,
        } => show::execute(&gate, registry.as_deref(), !no_phase, &format, &config),

        Commands::Apply {
            gate,
            input,
            demo,
            qubits,
            seed,
            registry,
            output,
        } => apply::execute(
            &gate,
            input.as_deref(),
            demo.as_deref(),
            qubits,
            seed,
            registry.as_deref(),
            output.as_deref(),
            &config,
        ),

        Commands::Gates => gates::execute(&config),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
