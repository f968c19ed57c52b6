//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use twirl_core::{GateCatalogue, TwirlConfig, TwirlingRegistry, TwirlingSet};
use twirl_ir::{Circuit, CircuitSnapshot};

/// Load a circuit from a JSON snapshot file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let snapshot: CircuitSnapshot = serde_json::from_str(&source)
        .with_context(|| format!("Invalid circuit JSON: {}", path.display()))?;

    Circuit::from_snapshot(snapshot).map_err(|e| anyhow::anyhow!("Invalid circuit: {e}"))
}

/// Save a circuit as a pretty-printed JSON snapshot.
pub fn save_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&circuit.snapshot())?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Build one of the demo circuits.
pub fn demo_circuit(name: &str, qubits: u32) -> Result<Circuit> {
    match name.to_lowercase().as_str() {
        "ghz" => {
            if qubits < 2 {
                anyhow::bail!("GHZ demo needs at least 2 qubits, got {qubits}");
            }
            Ok(Circuit::ghz(qubits)?)
        }
        "bell" => Ok(Circuit::bell()?),
        other => anyhow::bail!("Unknown demo circuit: '{other}'. Available: ghz, bell"),
    }
}

/// Registry file to use: explicit path, then configuration, then the default.
pub fn registry_path(explicit: Option<&Path>, config: &TwirlConfig) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.registry_path.clone())
        .or_else(TwirlingRegistry::default_path)
}

/// Load the registry, or generate the standard one in memory when no file exists.
///
/// An explicitly named file must exist.
pub fn load_registry(explicit: Option<&Path>, config: &TwirlConfig) -> Result<TwirlingRegistry> {
    if let Some(path) = registry_path(explicit, config).filter(|p| p.exists()) {
        info!(path = %path.display(), "Loading twirling registry");
        return TwirlingRegistry::load(&path)
            .with_context(|| format!("Failed to load registry: {}", path.display()));
    }
    if let Some(path) = explicit {
        anyhow::bail!("Registry not found: {}", path.display());
    }

    info!("No registry file found, generating the standard catalogue");
    Ok(TwirlingRegistry::build(&GateCatalogue::standard(), config)?)
}

/// Print a twirling set as a table.
pub fn print_set(set: &TwirlingSet, include_phase: bool) {
    println!(
        "{} {} ({} twirls)",
        style("Gate").bold(),
        style(set.gate()).cyan().bold(),
        set.len()
    );
    println!(
        "  {:>4}  {:<6} {:<6} {:<7} {:<7}{}",
        "#",
        "pre_c",
        "pre_t",
        "post_c",
        "post_t",
        if include_phase { "  phase" } else { "" }
    );

    for (i, entry) in set.iter().enumerate() {
        let a = entry.assignment;
        let phase = if include_phase {
            format!("  {}", style(entry.phase).yellow())
        } else {
            String::new()
        };
        println!(
            "  {:>4}  {:<6} {:<6} {:<7} {:<7}{}",
            i,
            a.pre_control.symbol(),
            a.pre_target.symbol(),
            a.post_control.symbol(),
            a.post_target.symbol(),
            phase
        );
    }
}
