//! Rule trait and the context rules run in.

use crate::descriptor::DiagnosticDescriptor;
use crate::predicate::{Membership, NamespaceFamily};
use crate::symbols::{Symbol, SymbolGraph, SymbolKind, TypeSymbol};
use crate::types::{Severity, Violation};

/// Read-only state shared by every rule invocation in a pass.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    membership: &'a Membership<'a>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context around a pass-scoped membership predicate.
    #[must_use]
    pub fn new(membership: &'a Membership<'a>) -> Self {
        Self { membership }
    }

    /// The graph being checked.
    #[must_use]
    pub fn graph(&self) -> &'a dyn SymbolGraph {
        self.membership.graph()
    }

    /// The forbidden namespace family.
    #[must_use]
    pub fn family(&self) -> &'a NamespaceFamily {
        self.membership.family()
    }

    /// Resolves a type reference.
    #[must_use]
    pub fn resolve(&self, id: Option<&str>) -> Option<&'a TypeSymbol> {
        self.membership.resolve(id)
    }

    /// Resolves `id` and returns the type if it, or any ancestor, is in the
    /// family. Unresolved references are never forbidden.
    #[must_use]
    pub fn forbidden_type(&self, id: Option<&str>) -> Option<&'a TypeSymbol> {
        self.resolve(id)
            .filter(|ty| self.membership.belongs(Some(*ty)))
    }

    /// The nearest ancestor of `ty` inside the family.
    #[must_use]
    pub fn first_forbidden_ancestor(&self, ty: &TypeSymbol) -> Option<&'a TypeSymbol> {
        self.membership.first_forbidden_ancestor(ty)
    }
}

/// A lint rule evaluated once per symbol of the kinds it registers for.
///
/// Rules hold no state across calls: every invocation is a function of the
/// symbol and the [`RuleContext`], so the analyzer may run them on any thread
/// and in any symbol order.
///
/// # Example
///
/// ```ignore
/// use layer_lint_core::{DiagnosticDescriptor, Rule, RuleContext, Symbol, SymbolKind, Violation};
///
/// pub struct NoForbiddenInterfaces;
///
/// impl Rule for NoForbiddenInterfaces {
///     fn descriptor(&self) -> &'static DiagnosticDescriptor { &DESCRIPTOR }
///     fn kinds(&self) -> &'static [SymbolKind] { &[SymbolKind::Type] }
///
///     fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
///         // ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Static description of the diagnostic this rule emits.
    fn descriptor(&self) -> &'static DiagnosticDescriptor;

    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Returns the rule code (e.g., "LL001").
    fn code(&self) -> &'static str {
        self.descriptor().code
    }

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        self.descriptor().title
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        self.descriptor().default_severity
    }

    /// Symbol kinds this rule is invoked for.
    fn kinds(&self) -> &'static [SymbolKind];

    /// Checks a single symbol.
    ///
    /// Violations for one symbol must come out in declaration order.
    fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
