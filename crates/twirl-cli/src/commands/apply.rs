//! Apply command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use twirl_core::{PassManager, TwirlConfig};
use twirl_ir::Circuit;

use super::common::{demo_circuit, load_circuit, load_registry, save_circuit};

/// Execute the apply command.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    gates: &[String],
    input: Option<&Path>,
    demo: Option<&str>,
    qubits: u32,
    seed: Option<u64>,
    registry: Option<&Path>,
    output: Option<&Path>,
    config: &TwirlConfig,
) -> Result<()> {
    let circuit = match (input, demo) {
        (Some(path), _) => load_circuit(path)?,
        (None, Some(name)) => demo_circuit(name, qubits)?,
        (None, None) => anyhow::bail!("Provide a circuit with --input or --demo"),
    };

    println!(
        "{} Twirling {} in {}",
        style("→").cyan().bold(),
        style(gates.join(", ")).yellow(),
        style(circuit.name()).green()
    );
    println!(
        "  Loaded: {} qubits, depth {}, {} ops",
        circuit.num_qubits(),
        circuit.depth(),
        circuit.dag().num_ops()
    );

    let registry = load_registry(registry, config)?;
    let seed = seed.or(config.seed);
    let pm = PassManager::twirling(&registry, gates, seed)?;

    let name = format!("{}_twirled", circuit.name());
    let default_output = PathBuf::from(format!("{name}.json"));
    let mut dag = circuit.into_dag();
    pm.run(&mut dag)?;
    let twirled = Circuit::from_dag(name, dag);

    println!("{} Twirling complete", style("✓").green().bold());
    println!(
        "  Result: depth {}, {} ops, global phase {:.6}",
        twirled.depth(),
        twirled.dag().num_ops(),
        twirled.global_phase()
    );
    match seed {
        Some(seed) => println!("  Seed: {}", style(seed).yellow()),
        None => println!("  Seed: {}", style("entropy (not reproducible)").dim()),
    }

    let output_path = output.map_or(default_output, Path::to_path_buf);
    save_circuit(&twirled, &output_path)?;
    println!("  Output: {}", style(output_path.display()).green());

    Ok(())
}
