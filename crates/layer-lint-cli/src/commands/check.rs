//! Check command implementation.

use anyhow::{bail, Context, Result};
use layer_lint_core::{Analyzer, Config, MatchMode, RuleBox, Severity, SymbolTable};
use layer_lint_rules::{rules_by_names, rules_from_config};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Forbidden namespace family.
    pub family: Option<String>,
    /// Namespace matching mode.
    pub match_mode: Option<MatchMode>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(family) = &self.family {
            config.boundary.forbidden_namespace.clone_from(family);
        }
        if let Some(mode) = self.match_mode {
            config.boundary.match_mode = mode;
        }
    }
}

/// Runs the check command.
pub fn run(
    graph_path: &Path,
    format: OutputFormat,
    overrides: &Overrides,
    source: &ConfigSource,
) -> Result<()> {
    let mut config = source.load()?;
    overrides.apply(&mut config);

    let rules = select_rules(&config, overrides.rules.as_deref())?;

    let graph = SymbolTable::from_file(graph_path)
        .with_context(|| format!("Failed to load symbol graph: {}", graph_path.display()))?;

    let analyzer = Analyzer::builder()
        .config(config)
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} ({} symbols) with {} rules against `{}`",
        graph_path.display(),
        graph.len(),
        analyzer.rule_count(),
        analyzer.family()
    );

    let result = analyzer.analyze(&graph);

    super::output::print(&result, format)?;

    let fail_on = analyzer.config().fail_on.unwrap_or(Severity::Error);
    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn select_rules(config: &Config, filter: Option<&str>) -> Result<Vec<RuleBox>> {
    let Some(filter) = filter else {
        return rules_from_config(config).context("Failed to select rules");
    };

    let names: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    let rules = rules_by_names(&names);
    if rules.is_empty() {
        bail!("--rules `{filter}` names no known rule; see `layer-lint list-rules`");
    }
    Ok(rules)
}
