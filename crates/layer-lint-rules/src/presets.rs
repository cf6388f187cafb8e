//! Rule presets and config-driven rule selection.

use crate::{InheritanceRule, MemberExposureRule, ParameterExposureRule};
use layer_lint_core::{Config, ConfigError, DiagnosticDescriptor, RuleBox, Severity};
use tracing::warn;

/// Preset configurations for layer-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// All rules at their default severities.
    Recommended,
    /// All rules reported as errors.
    Strict,
    /// Surface checks only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Names accepted by [`Preset::from_name`].
    pub const NAMES: [&'static str; 3] = ["recommended", "strict", "minimal"];

    /// Looks up a preset by its config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `inheritance` (LL001) - Forbids deriving from forbidden-family classes
/// - `member-exposure` (LL002) - Forbids exposed forbidden-family properties
/// - `parameter-exposure` (LL003) - Forbids exposed forbidden-family parameters
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns every rule with its severity raised to error.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(InheritanceRule::new().severity(Severity::Error)),
        Box::new(MemberExposureRule::new().severity(Severity::Error)),
        Box::new(ParameterExposureRule::new().severity(Severity::Error)),
    ]
}

/// Returns the minimal set of rules.
///
/// Only the exposure rules: a layer may keep deriving from business classes
/// internally while it stops leaking them through its surface.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MemberExposureRule::new()),
        Box::new(ParameterExposureRule::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(InheritanceRule::new()),
        Box::new(MemberExposureRule::new()),
        Box::new(ParameterExposureRule::new()),
    ]
}

/// Descriptors of all available rules, in code order.
#[must_use]
pub fn descriptors() -> Vec<&'static DiagnosticDescriptor> {
    all_rules().iter().map(|rule| rule.descriptor()).collect()
}

/// Builds the rule set a configuration asks for.
///
/// Starts from `config.preset` (default: recommended) and drops rules that
/// the configuration disables, or that are disabled by default and not
/// enabled explicitly.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] for an unknown preset name.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).ok_or_else(|| {
            ConfigError::Validation(format!(
                "unknown preset `{name}`. Valid presets: {}",
                Preset::NAMES.join(", ")
            ))
        })?,
    };

    Ok(preset
        .rules()
        .into_iter()
        .filter(|rule| {
            config
                .rule_enabled(rule.name(), rule.code())
                .unwrap_or(rule.descriptor().enabled_by_default)
        })
        .collect())
}

/// Selects rules by name or code (codes match case-insensitively).
///
/// Unknown entries are logged and ignored.
#[must_use]
pub fn rules_by_names<S: AsRef<str>>(names: &[S]) -> Vec<RuleBox> {
    let selects = |rule: &RuleBox, wanted: &str| {
        rule.name() == wanted || rule.code().eq_ignore_ascii_case(wanted)
    };

    let available = all_rules();
    for wanted in names.iter().map(|n| n.as_ref()) {
        if !available.iter().any(|rule| selects(rule, wanted)) {
            warn!("Unknown rule `{}` ignored", wanted);
        }
    }

    available
        .into_iter()
        .filter(|rule| names.iter().any(|wanted| selects(rule, wanted.as_ref())))
        .collect()
}
