//! Gates command implementation.

use anyhow::Result;
use console::style;

use twirl_core::{GateCatalogue, TwirlConfig, TwirlingRegistry};

use super::common::registry_path;

/// Execute the gates command.
pub fn execute(config: &TwirlConfig) -> Result<()> {
    let catalogue = GateCatalogue::standard();
    let cached = registry_path(None, config)
        .filter(|p| p.exists())
        .and_then(|p| TwirlingRegistry::load(p).ok());

    println!("{}", style("Standard two-qubit gates:").bold());
    for name in catalogue.names() {
        let twirls = cached
            .as_ref()
            .and_then(|r| r.get(name).ok())
            .map(|set| format!("{} twirls", set.len()));
        match twirls {
            Some(twirls) => println!("  {:<6} {}", style(name).cyan(), style(twirls).dim()),
            None => println!("  {}", style(name).cyan()),
        }
    }

    if cached.is_none() {
        println!();
        println!(
            "No registry cached. Run {} to create one.",
            style("twirl generate").yellow()
        );
    }

    Ok(())
}
