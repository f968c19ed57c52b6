//! Generate command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use twirl_core::{GateCatalogue, PhaseCorrection, TwirlConfig, TwirlingRegistry};

use super::common::registry_path;

/// Execute the generate command.
pub fn execute(gates: &[String], output: Option<&Path>, config: &TwirlConfig) -> Result<()> {
    let catalogue = if gates.is_empty() {
        GateCatalogue::standard()
    } else {
        GateCatalogue::standard().select(gates)?
    };

    println!(
        "{} Generating twirling sets for {} gates (tolerance {:e})",
        style("→").cyan().bold(),
        catalogue.len(),
        config.tolerance
    );

    let registry = TwirlingRegistry::build(&catalogue, config)?;

    for set in registry.iter() {
        let phase_pi = set
            .iter()
            .filter(|e| e.phase == PhaseCorrection::Pi)
            .count();
        println!(
            "  {:<6} {:>3} twirls ({} with phase π)",
            set.gate(),
            style(set.len()).green(),
            phase_pi
        );
    }

    let path = registry_path(output, config)
        .context("Could not determine a registry path; pass --output")?;
    registry.save(&path)?;

    println!("{} Registry saved", style("✓").green().bold());
    println!("  Output: {}", style(path.display()).green());

    Ok(())
}
