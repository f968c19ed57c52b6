//! Show command implementation.

use std::path::Path;

use anyhow::Result;

use twirl_core::TwirlConfig;

use super::common::{load_registry, print_set};

/// Execute the show command.
pub fn execute(
    gate: &str,
    registry: Option<&Path>,
    include_phase: bool,
    format: &str,
    config: &TwirlConfig,
) -> Result<()> {
    let registry = load_registry(registry, config)?;
    let set = registry.get(gate)?;

    match format.to_lowercase().as_str() {
        "table" => print_set(set, include_phase),
        "json" => {
            let value = if include_phase {
                serde_json::to_value(set)?
            } else {
                let assignments: Vec<String> =
                    set.iter().map(|e| e.assignment.to_string()).collect();
                serde_json::json!({ "gate": set.gate(), "assignments": assignments })
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }

    Ok(())
}
