//! Symbol-level suppression directives.
//!
//! A host maps whatever the source language offers (attributes, pragmas,
//! comments) onto a list of [`Suppression`]s attached to the symbol:
//!
//! ```json
//! { "rule": "member-exposure", "reason": "legacy binding, removed in v3" }
//! ```
//!
//! `rule` may be a rule name, a rule code, or `all`.

use serde::Deserialize;

/// A declared request to silence a rule on one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suppression {
    /// Rule name, code, or `all`.
    pub rule: String,
    /// Justification given by the author.
    #[serde(default)]
    pub reason: Option<String>,
}

impl Suppression {
    /// Creates a suppression without a reason.
    #[must_use]
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            reason: None,
        }
    }

    /// Sets the reason.
    #[must_use]
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    fn covers(&self, name: &str, code: &str) -> bool {
        self.rule == "all" || self.rule == name || self.rule.eq_ignore_ascii_case(code)
    }
}

/// Result of checking a symbol's suppressions for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// The rule is active on this symbol.
    Denied,
    /// The rule is suppressed, with an optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

/// Checks `suppressions` for an entry covering the rule `name` / `code`.
///
/// The first covering entry that carries a reason is preferred, so a
/// justified suppression is never reported as missing its reason just
/// because an unjustified duplicate precedes it.
#[must_use]
pub fn check_suppressions(suppressions: &[Suppression], name: &str, code: &str) -> AllowCheck {
    let mut covering = suppressions.iter().filter(|s| s.covers(name, code));
    let Some(first) = covering.next() else {
        return AllowCheck::Denied;
    };
    let reason = std::iter::once(first)
        .chain(covering)
        .find_map(|s| s.reason.clone());
    AllowCheck::Allowed { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_suppressions_denies() {
        assert_eq!(
            check_suppressions(&[], "inheritance", "LL001"),
            AllowCheck::Denied
        );
    }

    #[test]
    fn matches_by_name_code_and_all() {
        let by_name = [Suppression::new("inheritance")];
        let by_code = [Suppression::new("ll001")];
        let all = [Suppression::new("all")];
        for s in [&by_name[..], &by_code[..], &all[..]] {
            assert!(matches!(
                check_suppressions(s, "inheritance", "LL001"),
                AllowCheck::Allowed { .. }
            ));
        }
    }

    #[test]
    fn other_rule_does_not_match() {
        let s = [Suppression::new("member-exposure")];
        assert_eq!(
            check_suppressions(&s, "inheritance", "LL001"),
            AllowCheck::Denied
        );
    }

    #[test]
    fn reason_is_carried() {
        let s = [
            Suppression::new("inheritance"),
            Suppression::new("LL001").because("framework base type"),
        ];
        assert_eq!(
            check_suppressions(&s, "inheritance", "LL001"),
            AllowCheck::Allowed {
                reason: Some("framework base type".to_string())
            }
        );
    }
}
