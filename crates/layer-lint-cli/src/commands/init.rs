//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "layer-lint.toml";

const DEFAULT_CONFIG: &str = r#"# layer-lint configuration

# Rule preset: "recommended", "strict" or "minimal"
preset = "recommended"

# Exit with status 1 when a violation at or above this severity is found
fail_on = "error"

[boundary]
# Root namespace of the layer that must not leak into this one
forbidden_namespace = "Csla"

# "segment" matches whole dotted segments (Csla, Csla.Core, not CslaExtras);
# "prefix" matches any namespace starting with the string
match_mode = "segment"

# Inheritance chains longer than this are treated as malformed
max_ancestor_depth = 64

[analyzer]
# Check symbols that come from generated code
include_generated = false

# Check symbols on a worker pool
parallel = true
# parallelism = 4

# Rule configurations, keyed by rule name or code
# Each rule can be enabled/disabled and have its severity overridden

[rules.inheritance]
enabled = true

[rules.member-exposure]
enabled = true
# severity = "error"  # Override default severity

[rules.parameter-exposure]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let path = write_default(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Set [boundary] forbidden_namespace to the layer to keep out");
    println!("  2. Export a symbol graph from your build");
    println!("  3. Run: layer-lint check <GRAPH>");

    Ok(())
}

fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
