//! List rules command implementation.

use layer_lint_rules::{descriptors, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<20} {:<14} {:<9} Description",
        "Code", "Name", "Category", "Default"
    );
    println!("{}", "-".repeat(100));

    for descriptor in descriptors() {
        let default = if descriptor.enabled_by_default {
            descriptor.default_severity.to_string()
        } else {
            "off".to_string()
        };
        println!(
            "{:<8} {:<20} {:<14} {:<9} {}",
            descriptor.code, descriptor.name, descriptor.category, default, descriptor.title
        );
    }

    println!("\nPresets ({}):", Preset::NAMES.join(", "));
    println!("  recommended  - LL001, LL002, LL003 at their default severities (default)");
    println!("  strict       - LL001, LL002, LL003 reported as errors");
    println!("  minimal      - LL002, LL003 only (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  layer-lint check symbols.json --rules member-exposure,parameter-exposure");
    println!("  layer-lint check symbols.json --rules LL001");
}
