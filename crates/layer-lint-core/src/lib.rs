//! # layer-lint-core
//!
//! Core engine for layer-boundary linting over a declared-symbol graph.
//!
//! The host builds a [`SymbolGraph`] (types with their base types,
//! properties, methods and parameters). Rules ask one question of it: does a
//! symbol's exposed surface, or its own ancestry, reach into a forbidden
//! namespace family? This crate provides:
//!
//! - [`SymbolGraph`] and the in-memory [`SymbolTable`]
//! - [`NamespaceFamily`] and the memoized [`Membership`] predicate
//! - [`Rule`] trait and [`DiagnosticDescriptor`]
//! - [`Analyzer`] for running one pass and collecting a [`LintResult`]
//!
//! ## Example
//!
//! ```ignore
//! use layer_lint_core::{Analyzer, Config, SymbolTable};
//!
//! let graph = SymbolTable::from_file("symbols.json".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .config(Config::from_file("layer-lint.toml".as_ref())?)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze(&graph);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod descriptor;
mod predicate;
mod rule;
mod suppression;
mod symbols;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, BoundaryConfig, Config, ConfigError, RuleConfig, DEFAULT_FORBIDDEN_NAMESPACE,
    DEFAULT_MAX_ANCESTOR_DEPTH,
};
pub use descriptor::DiagnosticDescriptor;
pub use predicate::{MatchMode, Membership, NamespaceFamily};
pub use rule::{Rule, RuleBox, RuleContext};
pub use suppression::{check_suppressions, AllowCheck, Suppression};
pub use symbols::{
    Accessibility, GraphError, MethodSymbol, ParameterSymbol, PropertySymbol, Symbol, SymbolGraph,
    SymbolKind, SymbolTable, TypeKind, TypeSymbol,
};
pub use types::{Label, LintResult, Location, Severity, Suggestion, SymbolFault, Violation};
