//! Integration test: JSON symbol graph → SymbolTable → Analyzer.

use layer_lint_core::{
    Analyzer, Config, DiagnosticDescriptor, Rule, RuleContext, Severity, Symbol, SymbolKind,
    SymbolTable, Violation,
};

const EXPOSED_TYPE: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "IT001",
    name: "exposed-type",
    title: "Reports properties whose type belongs to the family",
    message_format: "'{0}' reaches '{1}'",
    category: "Architecture",
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help: None,
};

struct ExposedType;

impl Rule for ExposedType {
    fn descriptor(&self) -> &'static DiagnosticDescriptor {
        &EXPOSED_TYPE
    }

    fn kinds(&self) -> &'static [SymbolKind] {
        &[SymbolKind::Property]
    }

    fn check(&self, ctx: &RuleContext<'_>, symbol: Symbol<'_>) -> Vec<Violation> {
        let Symbol::Property(p) = symbol else {
            return Vec::new();
        };
        ctx.forbidden_type(p.ty.as_deref())
            .map(|ty| {
                EXPOSED_TYPE.violation(
                    self.default_severity(),
                    p.location.clone(),
                    &[p.name.as_str(), ty.id.as_str()],
                )
            })
            .into_iter()
            .collect()
    }
}

const GRAPH: &str = r#"{
    "types": [
        { "id": "App.Loop.A", "kind": "class", "namespace": "App.Loop", "base": "App.Loop.B" },
        { "id": "App.Loop.B", "kind": "class", "namespace": "App.Loop", "base": "App.Loop.A" },
        { "id": "App.Data.Customer", "kind": "class", "namespace": "App.Data", "base": "Csla.BusinessBase" }
    ],
    "references": [
        { "id": "Csla.BusinessBase", "kind": "class", "namespace": "Csla" },
        { "id": "App.Data.Customer", "kind": "class", "namespace": "Elsewhere" }
    ],
    "properties": [
        { "name": "Looping", "accessibility": "public", "type": "App.Loop.A" },
        {
            "name": "Customer",
            "accessibility": "public",
            "type": "App.Data.Customer",
            "location": { "file": "Web/Presenter.cs", "line": 7, "column": 9 }
        },
        {
            "name": "Legacy",
            "accessibility": "public",
            "type": "App.Data.Customer",
            "suppressions": [ { "rule": "IT001", "reason": "migrating in Q3" } ]
        },
        {
            "name": "Designer",
            "accessibility": "public",
            "type": "App.Data.Customer",
            "generated": true
        }
    ]
}"#;

fn analyze(config: Config) -> layer_lint_core::LintResult {
    let graph = SymbolTable::from_json(GRAPH).expect("graph should parse");
    Analyzer::builder()
        .config(config)
        .rule(ExposedType)
        .build()
        .expect("analyzer should build")
        .analyze(&graph)
}

#[test]
fn json_graph_end_to_end() {
    let result = analyze(Config::default());

    assert_eq!(
        result.violations.len(),
        1,
        "unexpected violations: {:#?}",
        result.violations
    );
    let v = &result.violations[0];
    assert_eq!(v.message, "'Customer' reaches 'App.Data.Customer'");
    assert_eq!(v.location.file.to_str(), Some("Web/Presenter.cs"));
    assert_eq!(v.location.line, 7);

    // Three types plus three properties; the generated one is skipped.
    assert_eq!(result.symbols_checked, 6);
    assert!(!result.cancelled);
    assert!(result.faults.is_empty());
}

#[test]
fn generated_symbols_can_be_included() {
    let config = Config::parse("[analyzer]\ninclude_generated = true\nparallel = false\n")
        .expect("config should parse");
    let result = analyze(config);
    assert_eq!(result.violations.len(), 2);
    assert_eq!(result.symbols_checked, 7);
}

#[test]
fn dedicated_pool_matches_global_pool() {
    let config = Config::parse("[analyzer]\nparallelism = 2\n").expect("config should parse");
    assert_eq!(
        analyze(config).violations,
        analyze(Config::default()).violations
    );
}

#[test]
fn family_from_config_changes_outcome() {
    let config = Config::parse("[boundary]\nforbidden_namespace = \"App.Loop\"\n")
        .expect("config should parse");
    let result = analyze(config);
    let messages: Vec<&str> = result.violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(messages, vec!["'Looping' reaches 'App.Loop.A'"]);
}

#[test]
fn namespaces_omitted_from_graph_are_inferred() {
    let graph = SymbolTable::from_json(
        r#"{
            "types": [ { "id": "App.Data.Customer", "kind": "class", "base": "Csla.BusinessBase" } ],
            "references": [ { "id": "Csla.BusinessBase", "kind": "class" } ],
            "properties": [ { "name": "Customer", "accessibility": "public", "type": "App.Data.Customer" } ]
        }"#,
    )
    .expect("graph should parse");
    let result = Analyzer::builder()
        .rule(ExposedType)
        .build()
        .expect("analyzer should build")
        .analyze(&graph);

    let messages: Vec<&str> = result.violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(messages, vec!["'Customer' reaches 'App.Data.Customer'"]);
}
