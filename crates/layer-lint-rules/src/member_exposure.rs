//! Rule to forbid exposed properties typed by the forbidden namespace family.
//!
//! Public and protected properties are part of a type's surface; a property
//! whose declared type belongs to the family (directly or through its
//! ancestry) leaks the business layer to every consumer. Internal and private
//! properties are not checked.

use layer_lint_core::{
    DiagnosticDescriptor, PropertySymbol, Rule, RuleContext, Severity, Symbol, SymbolKind,
    Violation,
};

/// Rule code for member-exposure.
pub const CODE: &str = "LL002";

/// Rule name for member-exposure.
pub const NAME: &str = "member-exposure";

/// Descriptor for member-exposure.
pub const DESCRIPTOR: DiagnosticDescriptor = DiagnosticDescriptor {
    code: CODE,
    name: NAME,
    title: "Forbids public or protected properties of forbidden-family types",
    message_format: "Property '{0}' exposes '{2}'-based type '{1}'",
    category: "Architecture",
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help: Some("Expose a DTO or view model instead of the business type"),
};

/// Reports exposed properties whose type belongs to the forbidden family.
#[derive(Debug, Clone)]
pub struct MemberExposureRule {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MemberExposureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberExposureRule {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: DESCRIPTOR.default_severity,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Checks one property.
    #[must_use]
    pub fn check_property(
        &self,
        ctx: &RuleContext<'_>,
        property: &PropertySymbol,
    ) -> Option<Violation> {
        if !property.accessibility.is_exposed() {
            return None;
        }
        let ty = ctx.forbidden_type(property.ty.as_deref())?;

        Some(DESCRIPTOR.violation(
            self.severity,
            property.location.clone(),
            &[
                property.name.as_str(),
                ty.display_name(),
                ctx.family().as_str(),
            ],
        ))
    }
}

impl Rule for MemberExposureRule {
    fn descriptor(&self) -> &'static DiagnosticDescriptor {
        &DESCRIPTOR
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn kinds(&self) -> &'static [SymbolKind] {
        &[SymbolKind::Property]
    }

    fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
        match symbol {
            Symbol::Property(property) => self.check_property(ctx, property).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}
