//! # layer-lint-rules
//!
//! Built-in layer-boundary rules for layer-lint.
//!
//! Each rule asks whether some part of a declared type's surface reaches
//! into the forbidden namespace family configured in `[boundary]`.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | LL001 | `inheritance` | Forbids classes inheriting from a forbidden-family base class |
//! | LL002 | `member-exposure` | Forbids public or protected properties of forbidden-family types |
//! | LL003 | `parameter-exposure` | Forbids public or protected method parameters of forbidden-family types |
//!
//! ## Usage
//!
//! ```ignore
//! use layer_lint_core::{Analyzer, SymbolTable};
//! use layer_lint_rules::{InheritanceRule, MemberExposureRule};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(InheritanceRule::new())
//!     .rule(MemberExposureRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze(&SymbolTable::from_file("symbols.json".as_ref())?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod inheritance;
pub mod member_exposure;
pub mod parameter_exposure;
mod presets;

pub use inheritance::InheritanceRule;
pub use member_exposure::MemberExposureRule;
pub use parameter_exposure::ParameterExposureRule;
pub use presets::{
    all_rules, descriptors, minimal_rules, recommended_rules, rules_by_names, rules_from_config,
    strict_rules, Preset,
};

/// Re-export core types for convenience.
pub use layer_lint_core::{Rule, Severity, Violation};
