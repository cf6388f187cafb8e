//! Static descriptions of the diagnostics a rule can emit.

use crate::types::{Location, Severity, Suggestion, Violation};

/// Identity and message template of one diagnostic.
///
/// `message_format` uses positional placeholders: `{0}`, `{1}`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    /// Stable rule code (e.g., "LL001").
    pub code: &'static str,
    /// Kebab-case rule name (e.g., "inheritance").
    pub name: &'static str,
    /// One-line title.
    pub title: &'static str,
    /// Message template.
    pub message_format: &'static str,
    /// Category shown by listings.
    pub category: &'static str,
    /// Severity used when the configuration does not override it.
    pub default_severity: Severity,
    /// Whether the rule runs when the configuration does not mention it.
    pub enabled_by_default: bool,
    /// Optional fix hint attached to every violation.
    pub help: Option<&'static str>,
}

impl DiagnosticDescriptor {
    /// Fills the message template with `args`.
    ///
    /// Placeholders without a matching argument are left as written.
    #[must_use]
    pub fn format_message(&self, args: &[&str]) -> String {
        let mut out = String::with_capacity(self.message_format.len());
        let mut rest = self.message_format;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let filled = after.find('}').and_then(|close| {
                after[..close]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .map(|arg| (*arg, close))
            });
            match filled {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Builds a violation for this descriptor.
    #[must_use]
    pub fn violation(&self, severity: Severity, location: Location, args: &[&str]) -> Violation {
        let violation = Violation::new(
            self.code,
            self.name,
            severity,
            location,
            self.format_message(args),
        );
        match self.help {
            Some(help) => violation.with_suggestion(Suggestion::new(help)),
            None => violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: DiagnosticDescriptor = DiagnosticDescriptor {
        code: "T001",
        name: "sample",
        title: "Sample",
        message_format: "Method '{0}' has parameter '{1}' of '{3}'-based type '{2}'",
        category: "Architecture",
        default_severity: Severity::Warning,
        enabled_by_default: true,
        help: Some("Use a DTO"),
    };

    #[test]
    fn fills_positional_placeholders() {
        let msg = SAMPLE.format_message(&["UpdateOrder", "customer", "DataCustomer", "Csla"]);
        assert_eq!(
            msg,
            "Method 'UpdateOrder' has parameter 'customer' of 'Csla'-based type 'DataCustomer'"
        );
    }

    #[test]
    fn arguments_are_not_reinterpreted() {
        let msg = SAMPLE.format_message(&["{1}", "x", "T", "F"]);
        assert!(msg.starts_with("Method '{1}' has parameter 'x'"));
    }

    #[test]
    fn missing_arguments_leave_placeholder() {
        let msg = SAMPLE.format_message(&["Run"]);
        assert_eq!(msg, "Method 'Run' has parameter '{1}' of '{3}'-based type '{2}'");
    }

    #[test]
    fn violation_carries_help() {
        let v = SAMPLE.violation(Severity::Warning, Location::default(), &["a", "b", "c", "d"]);
        assert_eq!(v.code, "T001");
        assert_eq!(v.rule, "sample");
        assert_eq!(v.suggestion.map(|s| s.message).as_deref(), Some("Use a DTO"));
    }
}
