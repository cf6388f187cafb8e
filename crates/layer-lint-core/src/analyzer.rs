//! Core analyzer for orchestrating one analysis pass.

use crate::config::{Config, ConfigError};
use crate::predicate::{Membership, NamespaceFamily};
use crate::rule::{Rule, RuleBox, RuleContext};
use crate::suppression::{check_suppressions, AllowCheck};
use crate::symbols::{Symbol, SymbolGraph, SymbolKind};
use crate::types::{LintResult, Severity, Suggestion, SymbolFault, Violation};

use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while setting up an analyzer.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum AnalyzerError {
    /// Configuration error.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The dedicated worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    #[diagnostic(code(layer_lint::analyzer::pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    cancellation: Option<Arc<AtomicBool>>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a flag that abandons the pass at the next symbol boundary once set.
    #[must_use]
    pub fn cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (an empty forbidden
    /// namespace, for instance) or the worker pool cannot be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let family = NamespaceFamily::new(
            config.boundary.forbidden_namespace.clone(),
            config.boundary.match_mode,
        )?;

        let pool = match config.analyzer.parallelism {
            Some(threads) if config.analyzer.parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("layer-lint-{i}"))
                    .build()?,
            ),
            _ => None,
        };

        Ok(Analyzer {
            rules: self.rules,
            config,
            family,
            pool,
            cancellation: self.cancellation,
        })
    }
}

/// A rule resolved against the configuration for one pass.
struct ActiveRule<'r> {
    rule: &'r dyn Rule,
    severity: Severity,
    kinds: &'static [SymbolKind],
}

enum Outcome {
    Skipped,
    Cancelled,
    Checked {
        violations: Vec<Violation>,
        faults: Vec<SymbolFault>,
    },
}

/// The main analyzer that runs rules over a symbol graph.
///
/// Use [`Analyzer::builder()`] to construct an instance. One analyzer may run
/// any number of passes; each pass gets its own membership cache.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    config: Config,
    family: NamespaceFamily,
    pool: Option<rayon::ThreadPool>,
    cancellation: Option<Arc<AtomicBool>>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the forbidden namespace family.
    #[must_use]
    pub fn family(&self) -> &NamespaceFamily {
        &self.family
    }

    /// Returns the effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every enabled rule over every declared symbol of `graph`.
    ///
    /// Violations come out grouped by symbol in enumeration order (types,
    /// then properties, then methods), so repeated passes over an unchanged
    /// graph produce identical results whether or not the pass is parallel.
    #[must_use]
    pub fn analyze(&self, graph: &dyn SymbolGraph) -> LintResult {
        let active = self.active_rules();
        let symbols: Vec<Symbol<'_>> = graph
            .types()
            .iter()
            .map(Symbol::Type)
            .chain(graph.properties().iter().map(Symbol::Property))
            .chain(graph.methods().iter().map(Symbol::Method))
            .collect();

        info!(
            "Starting analysis of {} symbols with {} rules (family `{}`)",
            symbols.len(),
            active.len(),
            self.family
        );

        let membership = Membership::new(
            graph,
            &self.family,
            self.config.boundary.max_ancestor_depth,
        );
        let ctx = RuleContext::new(&membership);

        let outcomes: Vec<Outcome> = if self.config.analyzer.parallel {
            let run = || {
                symbols
                    .par_iter()
                    .map(|symbol| self.check_symbol(&ctx, &active, *symbol))
                    .collect::<Vec<Outcome>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        } else {
            symbols
                .iter()
                .map(|symbol| self.check_symbol(&ctx, &active, *symbol))
                .collect()
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Skipped => {}
                Outcome::Cancelled => result.cancelled = true,
                Outcome::Checked { violations, faults } => {
                    result.symbols_checked += 1;
                    result.violations.extend(violations);
                    result.faults.extend(faults);
                }
            }
        }

        if result.cancelled {
            warn!(
                "Analysis cancelled after {} of {} symbols",
                result.symbols_checked,
                symbols.len()
            );
        }
        info!(
            "Analysis complete: {} violations in {} symbols ({} memoized types)",
            result.violations.len(),
            result.symbols_checked,
            membership.cached_types()
        );

        result
    }

    fn active_rules(&self) -> Vec<ActiveRule<'_>> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let descriptor = rule.descriptor();
                let enabled = self
                    .config
                    .rule_enabled(rule.name(), rule.code())
                    .unwrap_or(descriptor.enabled_by_default);
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                    return None;
                }
                let severity = self
                    .config
                    .rule_severity(rule.name(), rule.code())
                    .unwrap_or_else(|| rule.default_severity());
                Some(ActiveRule {
                    rule: &**rule,
                    severity,
                    kinds: rule.kinds(),
                })
            })
            .collect()
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn check_symbol(
        &self,
        ctx: &RuleContext<'_>,
        active: &[ActiveRule<'_>],
        symbol: Symbol<'_>,
    ) -> Outcome {
        if self.is_cancelled() {
            return Outcome::Cancelled;
        }
        if symbol.is_generated() && !self.config.analyzer.include_generated {
            debug!("Skipping generated {}: {}", symbol.kind(), symbol.identity());
            return Outcome::Skipped;
        }

        let mut violations = Vec::new();
        let mut faults = Vec::new();

        for entry in active.iter().filter(|a| a.kinds.contains(&symbol.kind())) {
            match panic::catch_unwind(AssertUnwindSafe(|| entry.rule.check(ctx, symbol))) {
                Ok(found) => violations.extend(Self::finish(entry, symbol, found)),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(
                        "Rule {} failed on {}: {}",
                        entry.rule.name(),
                        symbol.identity(),
                        message
                    );
                    faults.push(SymbolFault {
                        rule: entry.rule.name().to_string(),
                        symbol: symbol.identity(),
                        message,
                    });
                }
            }
        }

        Outcome::Checked { violations, faults }
    }

    /// Applies the configured severity and the symbol's suppressions.
    fn finish(
        entry: &ActiveRule<'_>,
        symbol: Symbol<'_>,
        mut found: Vec<Violation>,
    ) -> Vec<Violation> {
        if found.is_empty() {
            return found;
        }

        let name = entry.rule.name();
        let code = entry.rule.code();
        match check_suppressions(symbol.suppressions(), name, code) {
            AllowCheck::Denied => {
                for v in &mut found {
                    v.severity = entry.severity;
                }
                found
            }
            AllowCheck::Allowed { reason: Some(reason) } => {
                debug!(
                    "Suppressed {} on {}: {}",
                    name,
                    symbol.identity(),
                    reason
                );
                Vec::new()
            }
            AllowCheck::Allowed { reason: None } if entry.severity == Severity::Error => {
                vec![Violation::new(
                    code,
                    name,
                    Severity::Warning,
                    symbol.location().clone(),
                    format!(
                        "Suppression of '{name}' on '{}' is missing a required reason",
                        symbol.identity()
                    ),
                )
                .with_suggestion(Suggestion::new(
                    "Add a reason explaining why this exception is necessary",
                ))]
            }
            AllowCheck::Allowed { reason: None } => Vec::new(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DiagnosticDescriptor;
    use crate::suppression::Suppression;
    use crate::symbols::{Accessibility, PropertySymbol, SymbolTable, TypeSymbol};
    use crate::types::Location;

    const FLAG_ALL: DiagnosticDescriptor = DiagnosticDescriptor {
        code: "TEST001",
        name: "flag-all",
        title: "Flags every property",
        message_format: "Property '{0}'",
        category: "Test",
        default_severity: Severity::Warning,
        enabled_by_default: true,
        help: None,
    };

    const OPT_IN: DiagnosticDescriptor = DiagnosticDescriptor {
        code: "TEST002",
        name: "opt-in",
        title: "Disabled unless configured",
        message_format: "Property '{0}'",
        category: "Test",
        default_severity: Severity::Warning,
        enabled_by_default: false,
        help: None,
    };

    struct FlagAll(&'static DiagnosticDescriptor);

    impl Rule for FlagAll {
        fn descriptor(&self) -> &'static DiagnosticDescriptor {
            self.0
        }

        fn kinds(&self) -> &'static [SymbolKind] {
            &[SymbolKind::Property]
        }

        fn check(&self, _ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
            match symbol {
                Symbol::Property(p) => {
                    vec![self
                        .0
                        .violation(self.default_severity(), p.location.clone(), &[p.name.as_str()])]
                }
                _ => Vec::new(),
            }
        }
    }

    struct Explodes;

    impl Rule for Explodes {
        fn descriptor(&self) -> &'static DiagnosticDescriptor {
            &FLAG_ALL
        }

        fn kinds(&self) -> &'static [SymbolKind] {
            &[SymbolKind::Property]
        }

        fn check(&self, _ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
            if let Symbol::Property(p) = symbol {
                assert!(p.name != "Boom", "cannot check Boom");
            }
            Vec::new()
        }
    }

    fn graph() -> SymbolTable {
        SymbolTable::new()
            .with_type(TypeSymbol::class("App.Presenter"))
            .with_property(
                PropertySymbol::new("A", Accessibility::Public, "System.String")
                    .at(Location::new("p.cs", 1, 1)),
            )
            .with_property(
                PropertySymbol::new("B", Accessibility::Public, "System.String")
                    .at(Location::new("p.cs", 2, 1)),
            )
    }

    fn sequential() -> Config {
        let mut config = Config::default();
        config.analyzer.parallel = false;
        config
    }

    #[test]
    fn empty_family_rejected_at_build() {
        let mut config = Config::default();
        config.boundary.forbidden_namespace = String::new();
        let err = Analyzer::builder().config(config).build().err();
        assert!(matches!(
            err,
            Some(AnalyzerError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn no_rules_means_no_diagnostics() {
        let analyzer = Analyzer::builder().build().expect("analyzer should build");
        let result = analyzer.analyze(&graph());
        assert!(result.violations.is_empty());
        assert_eq!(result.symbols_checked, 3);
    }

    #[test]
    fn rules_only_see_registered_kinds() {
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&graph());
        let names: Vec<&str> = result.violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(names, vec!["Property 'A'", "Property 'B'"]);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let mut config = sequential();
        config.rules.insert(
            "flag-all".to_string(),
            crate::config::RuleConfig {
                enabled: Some(false),
                severity: None,
            },
        );
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        assert!(analyzer.analyze(&graph()).violations.is_empty());
    }

    #[test]
    fn disabled_by_default_rule_runs_when_enabled_by_code() {
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&OPT_IN))
            .build()
            .expect("analyzer should build");
        assert!(analyzer.analyze(&graph()).violations.is_empty());

        let mut config = sequential();
        config.rules.insert(
            "TEST002".to_string(),
            crate::config::RuleConfig {
                enabled: Some(true),
                severity: None,
            },
        );
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&OPT_IN))
            .build()
            .expect("analyzer should build");
        assert_eq!(analyzer.analyze(&graph()).violations.len(), 2);
    }

    #[test]
    fn severity_override_applies() {
        let mut config = sequential();
        config.rules.insert(
            "flag-all".to_string(),
            crate::config::RuleConfig {
                enabled: None,
                severity: Some(Severity::Error),
            },
        );
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&graph());
        assert!(result.has_errors());
    }

    #[test]
    fn suppression_drops_violation() {
        let table = SymbolTable::new().with_property(
            PropertySymbol::new("A", Accessibility::Public, "X.Y")
                .suppress(Suppression::new("flag-all").because("legacy")),
        );
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        assert!(analyzer.analyze(&table).violations.is_empty());
    }

    #[test]
    fn error_suppression_without_reason_is_reported() {
        let table = SymbolTable::new().with_property(
            PropertySymbol::new("A", Accessibility::Public, "X.Y")
                .in_type("App.P")
                .suppress(Suppression::new("TEST001")),
        );
        let mut config = sequential();
        config.rules.insert(
            "flag-all".to_string(),
            crate::config::RuleConfig {
                enabled: None,
                severity: Some(Severity::Error),
            },
        );
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&table);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Warning);
        assert!(result.violations[0].message.contains("missing a required reason"));
    }

    #[test]
    fn generated_symbols_are_skipped_unless_included() {
        let table = SymbolTable::new()
            .with_property(PropertySymbol::new("A", Accessibility::Public, "X.Y").generated());
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&table);
        assert!(result.violations.is_empty());
        assert_eq!(result.symbols_checked, 0);

        let mut config = sequential();
        config.analyzer.include_generated = true;
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        assert_eq!(analyzer.analyze(&table).violations.len(), 1);
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let table = SymbolTable::new()
            .with_property(PropertySymbol::new("Boom", Accessibility::Public, "X.Y"))
            .with_property(PropertySymbol::new("Fine", Accessibility::Public, "X.Y"));
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(Explodes)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&table);
        assert_eq!(result.faults.len(), 1);
        assert_eq!(result.faults[0].symbol, "Boom");
        assert!(result.faults[0].message.contains("cannot check Boom"));
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.symbols_checked, 2);
    }

    #[test]
    fn cancelled_pass_stops_at_symbol_boundary() {
        let flag = Arc::new(AtomicBool::new(true));
        let analyzer = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&FLAG_ALL))
            .cancellation(Arc::clone(&flag))
            .build()
            .expect("analyzer should build");
        let result = analyzer.analyze(&graph());
        assert!(result.cancelled);
        assert_eq!(result.symbols_checked, 0);

        flag.store(false, Ordering::Relaxed);
        let result = analyzer.analyze(&graph());
        assert!(!result.cancelled);
        assert_eq!(result.violations.len(), 2);
    }

    #[test]
    fn parallel_and_sequential_passes_agree() {
        let mut config = Config::default();
        config.analyzer.parallelism = Some(2);
        let parallel = Analyzer::builder()
            .config(config)
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");
        let sequential = Analyzer::builder()
            .config(sequential())
            .rule(FlagAll(&FLAG_ALL))
            .build()
            .expect("analyzer should build");

        let table = graph();
        let a = parallel.analyze(&table);
        let b = sequential.analyze(&table);
        assert_eq!(a.violations, b.violations);
        assert_eq!(a.violations, parallel.analyze(&table).violations);
    }
}
