//! Core types for diagnostics and pass results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that the host may treat as build-breaking.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location token supplied by the host.
///
/// The engine never interprets a location; it copies whatever the
/// originating symbol carries into the diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source file path as reported by the host.
    #[serde(default)]
    pub file: PathBuf,
    /// Line number (1-indexed, 0 when unknown).
    #[serde(default)]
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    #[serde(default)]
    pub column: usize,
    /// Byte offset in file.
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Returns true if the host supplied no position information.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file.as_os_str().is_empty() && self.line == 0
    }
}

/// A labeled location giving additional context for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A diagnostic produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "LL001").
    pub code: String,
    /// Rule name (e.g., "inheritance").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Location forwarded from the originating symbol.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A rule invocation that panicked and was isolated from the rest of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFault {
    /// Name of the rule that failed.
    pub rule: String,
    /// Identity of the symbol being checked.
    pub symbol: String,
    /// Panic payload, when it was a string.
    pub message: String,
}

/// Result of one analysis pass.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of symbols inspected.
    pub symbols_checked: usize,
    /// Rule invocations that failed without aborting the pass.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<SymbolFault>,
    /// Whether the pass was abandoned before every symbol was checked.
    #[serde(default)]
    pub cancelled: bool,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations with the given rule code, in result order.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.code == code).collect()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "LL002",
            "member-exposure",
            severity,
            Location::new("Web/WebOrderPresenter.cs", 17, 30),
            "Property 'Customer' exposes 'Csla'-based type 'DataCustomer'",
        )
    }

    #[test]
    fn display_is_compact_single_line() {
        let v = make_violation(Severity::Warning);
        insta::assert_snapshot!(
            v.to_string(),
            @"Web/WebOrderPresenter.cs:17:30: warning [LL002] Property 'Customer' exposes 'Csla'-based type 'DataCustomer'"
        );
    }

    #[test]
    fn has_violations_at_respects_threshold() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn count_by_severity_counts_each_level() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Error));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
    }

    #[test]
    fn unknown_location_detected() {
        assert!(Location::default().is_unknown());
        assert!(!Location::new("a.cs", 1, 1).is_unknown());
    }
}
