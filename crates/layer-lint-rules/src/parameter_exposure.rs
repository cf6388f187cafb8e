//! Rule to forbid exposed methods taking forbidden-family parameters.
//!
//! Each offending parameter is reported on its own, in declaration order,
//! so `f(a: Business, b: Business)` yields two diagnostics. Methods that are
//! not public or protected are skipped without looking at their parameters.

use layer_lint_core::{
    DiagnosticDescriptor, MethodSymbol, Rule, RuleContext, Severity, Symbol, SymbolKind, Violation,
};

/// Rule code for parameter-exposure.
pub const CODE: &str = "LL003";

/// Rule name for parameter-exposure.
pub const NAME: &str = "parameter-exposure";

/// Descriptor for parameter-exposure.
pub const DESCRIPTOR: DiagnosticDescriptor = DiagnosticDescriptor {
    code: CODE,
    name: NAME,
    title: "Forbids public or protected method parameters of forbidden-family types",
    message_format: "Method '{0}' has parameter '{1}' of '{3}'-based type '{2}'",
    category: "Architecture",
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help: Some("Accept a DTO or view model and map it to the business type inside the layer"),
};

/// Reports exposed method parameters whose type belongs to the forbidden family.
#[derive(Debug, Clone)]
pub struct ParameterExposureRule {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ParameterExposureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterExposureRule {
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

    /// Checks one method, returning one violation per offending parameter.
    #[must_use]
    pub fn check_method(&self, ctx: &RuleContext<'_>, method: &MethodSymbol) -> Vec<Violation> {
        if !method.accessibility.is_exposed() {
            return Vec::new();
        }

        method
            .parameters
            .iter()
            .filter_map(|param| {
                let ty = ctx.forbidden_type(param.ty.as_deref())?;
                // Hosts without parameter positions get the method's.
                let location = if param.location.is_unknown() {
                    method.location.clone()
                } else {
                    param.location.clone()
                };
                Some(DESCRIPTOR.violation(
                    self.severity,
                    location,
                    &[
                        method.name.as_str(),
                        param.name.as_str(),
                        ty.display_name(),
                        ctx.family().as_str(),
                    ],
                ))
            })
            .collect()
    }
}

impl Rule for ParameterExposureRule {
    fn descriptor(&self) -> &'static DiagnosticDescriptor {
        &DESCRIPTOR
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn kinds(&self) -> &'static [SymbolKind] {
        &[SymbolKind::Method]
    }

    fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
        match symbol {
            Symbol::Method(method) => self.check_method(ctx, method),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::{
        Accessibility, Location, MatchMode, Membership, NamespaceFamily, ParameterSymbol,
        SymbolTable, TypeSymbol,
    };

    fn graph() -> SymbolTable {
        SymbolTable::new()
            .with_reference(TypeSymbol::class("Csla.BusinessBase"))
            .with_reference(TypeSymbol::class("System.Int32"))
            .with_type(TypeSymbol::class("App.Data.DataCustomer").with_base("Csla.BusinessBase"))
            .with_type(TypeSymbol::class("App.Data.DataOrder").with_base("Csla.BusinessBase"))
    }

    fn check(method: &MethodSymbol) -> Vec<Violation> {
        let graph = graph();
        let family = NamespaceFamily::new("Csla", MatchMode::Segment).expect("valid family");
        let membership = Membership::new(&graph, &family, 64);
        let ctx = RuleContext::new(&membership);
        ParameterExposureRule::new().check_method(&ctx, method)
    }

    #[test]
    fn each_offending_parameter_is_reported_in_order() {
        let method = MethodSymbol::new("Merge", Accessibility::Public)
            .param(ParameterSymbol::new("p1", "App.Data.DataCustomer"))
            .param(ParameterSymbol::new("p2", "System.Int32"))
            .param(ParameterSymbol::new("p3", "App.Data.DataOrder"));

        let out = check(&method);
        let messages: Vec<&str> = out.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Method 'Merge' has parameter 'p1' of 'Csla'-based type 'DataCustomer'",
                "Method 'Merge' has parameter 'p3' of 'Csla'-based type 'DataOrder'",
            ]
        );
    }

    #[test]
    fn same_type_twice_is_not_deduplicated() {
        let method = MethodSymbol::new("Swap", Accessibility::Protected)
            .param(ParameterSymbol::new("left", "App.Data.DataCustomer"))
            .param(ParameterSymbol::new("right", "App.Data.DataCustomer"));
        assert_eq!(check(&method).len(), 2);
    }

    #[test]
    fn non_exposed_methods_short_circuit() {
        let method = MethodSymbol::new("Load", Accessibility::Private)
            .param(ParameterSymbol::new("customer", "App.Data.DataCustomer"));
        assert!(check(&method).is_empty());

        let internal = MethodSymbol::new("Load", Accessibility::Internal)
            .param(ParameterSymbol::new("customer", "App.Data.DataCustomer"));
        assert!(check(&internal).is_empty());
    }

    #[test]
    fn parameter_location_wins_over_method_location() {
        let method = MethodSymbol::new("ProcessOrder", Accessibility::Public)
            .at(Location::new("Web/Presenter.cs", 20, 5))
            .param(
                ParameterSymbol::new("customer", "App.Data.DataCustomer")
                    .at(Location::new("Web/Presenter.cs", 20, 30)),
            )
            .param(ParameterSymbol::new("order", "App.Data.DataOrder"));

        let out = check(&method);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].location.line, out[0].location.column), (20, 30));
        assert_eq!((out[1].location.line, out[1].location.column), (20, 5));
    }

    #[test]
    fn unresolved_parameter_types_are_clean() {
        let mut param = ParameterSymbol::new("x", "Vendor.Widget");
        let method = MethodSymbol::new("Run", Accessibility::Public).param(param.clone());
        assert!(check(&method).is_empty());

        param.ty = None;
        let method = MethodSymbol::new("Run", Accessibility::Public).param(param);
        assert!(check(&method).is_empty());
    }

    #[test]
    fn no_parameters_no_violations() {
        let method = MethodSymbol::new("Refresh", Accessibility::Public);
        assert!(check(&method).is_empty());
    }
}
