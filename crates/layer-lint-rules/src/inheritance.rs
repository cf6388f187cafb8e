//! Rule to forbid classes deriving from the forbidden namespace family.
//!
//! # Rationale
//!
//! A class in an upper layer that inherits from a business-layer base class
//! drags the whole framework contract into that layer. Only the nearest
//! offending ancestor is reported, once per class.
//!
//! # Suppression
//!
//! - `suppressions = [{ rule = "inheritance", reason = "..." }]` on the type

use layer_lint_core::{
    DiagnosticDescriptor, Label, Rule, RuleContext, Severity, Symbol, SymbolKind, TypeKind,
    TypeSymbol, Violation,
};

/// Rule code for inheritance.
pub const CODE: &str = "LL001";

/// Rule name for inheritance.
pub const NAME: &str = "inheritance";

/// Descriptor for inheritance.
pub const DESCRIPTOR: DiagnosticDescriptor = DiagnosticDescriptor {
    code: CODE,
    name: NAME,
    title: "Forbids classes inheriting from the forbidden namespace family",
    message_format: "Class '{0}' inherits from a '{1}' base class",
    category: "Architecture",
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help: Some("Compose a layer-local type around the business object instead of deriving from it"),
};

/// Reports classes with an ancestor in the forbidden family.
#[derive(Debug, Clone)]
pub struct InheritanceRule {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for InheritanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InheritanceRule {
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

    /// Checks one type. Non-class types never match.
    #[must_use]
    pub fn check_type(&self, ctx: &RuleContext<'_>, ty: &TypeSymbol) -> Option<Violation> {
        if ty.kind != TypeKind::Class {
            return None;
        }
        let ancestor = ctx.first_forbidden_ancestor(ty)?;

        Some(
            DESCRIPTOR
                .violation(
                    self.severity,
                    ty.location.clone(),
                    &[ty.display_name(), ctx.family().as_str()],
                )
                .with_label(Label::new(
                    ancestor.location.clone(),
                    format!("nearest forbidden ancestor: {}", ancestor.id),
                )),
        )
    }
}

impl Rule for InheritanceRule {
    fn descriptor(&self) -> &'static DiagnosticDescriptor {
        &DESCRIPTOR
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn kinds(&self) -> &'static [SymbolKind] {
        &[SymbolKind::Type]
    }

    fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
        match symbol {
            Symbol::Type(ty) => self.check_type(ctx, ty).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}
