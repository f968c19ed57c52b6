//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Pauli twirling for quantum circuits",
        style("Twirl").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  twirl-ir    Circuit intermediate representation");
    println!("  twirl-core  Twirling set generation and substitution");
    println!("  twirl-cli   Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
