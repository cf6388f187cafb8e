//! Declared-symbol model and the host graph interface.
//!
//! The host (a compiler front end, an indexer, or a JSON export of one)
//! owns the graph. Rules only ever read it through [`SymbolGraph`].

use crate::suppression::Suppression;
use crate::types::Location;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessibility {
    /// Visible everywhere.
    Public,
    /// Visible to derived types.
    Protected,
    /// Visible within the declaring assembly or crate.
    Internal,
    /// Visible within the declaring type.
    Private,
    /// `protected internal`.
    ProtectedInternal,
    /// `private protected`.
    PrivateProtected,
    /// Anything the host could not classify.
    #[serde(other)]
    Other,
}

impl Accessibility {
    /// Whether a member with this accessibility is part of the public surface
    /// checked by the exposure rules. Only `public` and `protected` qualify.
    #[must_use]
    pub fn is_exposed(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

impl std::fmt::Display for Accessibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Kind of a type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A class (the only kind the inheritance rule inspects).
    Class,
    /// An interface.
    Interface,
    /// A value type.
    Struct,
    /// An enumeration.
    Enum,
    /// Any other kind.
    #[serde(other)]
    Other,
}

/// The symbol kinds a rule can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Declared types.
    Type,
    /// Declared properties.
    Property,
    /// Declared methods.
    Method,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Property => write!(f, "property"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// A type declared in, or referenced by, the analyzed code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeSymbol {
    /// Fully qualified name; the identity of the type.
    pub id: String,
    /// Display name. Derived from `id` when empty.
    #[serde(default)]
    pub name: String,
    /// Containing namespace, if any. Inferred from `id` when a loaded graph
    /// omits it.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Fully qualified name of the direct base type, if any.
    #[serde(default)]
    pub base: Option<String>,
    /// Type kind.
    pub kind: TypeKind,
    /// Declaration location.
    #[serde(default)]
    pub location: Location,
    /// Whether the type lives in generated code.
    #[serde(default)]
    pub generated: bool,
    /// Declared suppressions.
    #[serde(default)]
    pub suppressions: Vec<Suppression>,
}

impl TypeSymbol {
    /// Creates a type from its fully qualified name.
    ///
    /// The namespace and display name are split off at the last `.`.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: TypeKind) -> Self {
        let id = id.into();
        let (namespace, name) = match id.rsplit_once('.') {
            Some((ns, name)) => (Some(ns.to_string()), name.to_string()),
            None => (None, id.clone()),
        };
        Self {
            id,
            name,
            namespace,
            base: None,
            kind,
            location: Location::default(),
            generated: false,
            suppressions: Vec::new(),
        }
    }

    /// Creates a class from its fully qualified name.
    #[must_use]
    pub fn class(id: impl Into<String>) -> Self {
        Self::new(id, TypeKind::Class)
    }

    /// Sets the direct base type.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Overrides the containing namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(String::from);
        self
    }

    fn infer_namespace(mut self) -> Self {
        if self.namespace.is_none() {
            self.namespace = self.id.rsplit_once('.').map(|(ns, _)| ns.to_string());
        }
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Marks the type as generated code.
    #[must_use]
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Adds a suppression.
    #[must_use]
    pub fn suppress(mut self, suppression: Suppression) -> Self {
        self.suppressions.push(suppression);
        self
    }

    /// Returns the display name, falling back to the last `id` segment.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.rsplit('.').next().unwrap_or(&self.id)
        } else {
            &self.name
        }
    }
}

/// A declared property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertySymbol {
    /// Property name.
    pub name: String,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// Fully qualified name of the declared type. `None` when unresolved.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Fully qualified name of the declaring type.
    #[serde(default)]
    pub containing_type: Option<String>,
    /// Declaration location.
    #[serde(default)]
    pub location: Location,
    /// Whether the property lives in generated code.
    #[serde(default)]
    pub generated: bool,
    /// Declared suppressions.
    #[serde(default)]
    pub suppressions: Vec<Suppression>,
}

impl PropertySymbol {
    /// Creates a property with a declared type reference.
    #[must_use]
    pub fn new(name: impl Into<String>, accessibility: Accessibility, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessibility,
            ty: Some(ty.into()),
            containing_type: None,
            location: Location::default(),
            generated: false,
            suppressions: Vec::new(),
        }
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn in_type(mut self, containing_type: impl Into<String>) -> Self {
        self.containing_type = Some(containing_type.into());
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Marks the property as generated code.
    #[must_use]
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Adds a suppression.
    #[must_use]
    pub fn suppress(mut self, suppression: Suppression) -> Self {
        self.suppressions.push(suppression);
        self
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParameterSymbol {
    /// Parameter name.
    pub name: String,
    /// Fully qualified name of the declared type. `None` when unresolved.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Declaration location.
    #[serde(default)]
    pub location: Location,
}

impl ParameterSymbol {
    /// Creates a parameter with a declared type reference.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty.into()),
            location: Location::default(),
        }
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodSymbol {
    /// Method name.
    pub name: String,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
    /// Fully qualified name of the declaring type.
    #[serde(default)]
    pub containing_type: Option<String>,
    /// Declaration location.
    #[serde(default)]
    pub location: Location,
    /// Whether the method lives in generated code.
    #[serde(default)]
    pub generated: bool,
    /// Declared suppressions. They also cover the method's parameters.
    #[serde(default)]
    pub suppressions: Vec<Suppression>,
}

impl MethodSymbol {
    /// Creates a method without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, accessibility: Accessibility) -> Self {
        Self {
            name: name.into(),
            accessibility,
            parameters: Vec::new(),
            containing_type: None,
            location: Location::default(),
            generated: false,
            suppressions: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, parameter: ParameterSymbol) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn in_type(mut self, containing_type: impl Into<String>) -> Self {
        self.containing_type = Some(containing_type.into());
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Marks the method as generated code.
    #[must_use]
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Adds a suppression.
    #[must_use]
    pub fn suppress(mut self, suppression: Suppression) -> Self {
        self.suppressions.push(suppression);
        self
    }
}

/// A borrowed symbol of any checked kind, as handed to rules.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    /// A declared type.
    Type(&'a TypeSymbol),
    /// A declared property.
    Property(&'a PropertySymbol),
    /// A declared method.
    Method(&'a MethodSymbol),
}

impl<'a> Symbol<'a> {
    /// Returns the kind of this symbol.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Type(_) => SymbolKind::Type,
            Self::Property(_) => SymbolKind::Property,
            Self::Method(_) => SymbolKind::Method,
        }
    }

    /// Human-readable identity used in logs and fault reports.
    #[must_use]
    pub fn identity(&self) -> String {
        fn member(container: Option<&String>, name: &str) -> String {
            match container {
                Some(c) => format!("{c}.{name}"),
                None => name.to_string(),
            }
        }
        match self {
            Self::Type(t) => t.id.clone(),
            Self::Property(p) => member(p.containing_type.as_ref(), &p.name),
            Self::Method(m) => member(m.containing_type.as_ref(), &m.name),
        }
    }

    /// Whether the symbol lives in generated code.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        match self {
            Self::Type(t) => t.generated,
            Self::Property(p) => p.generated,
            Self::Method(m) => m.generated,
        }
    }

    /// Declaration location of the symbol.
    #[must_use]
    pub fn location(&self) -> &'a Location {
        match *self {
            Self::Type(t) => &t.location,
            Self::Property(p) => &p.location,
            Self::Method(m) => &m.location,
        }
    }

    /// Suppressions declared on the symbol.
    #[must_use]
    pub fn suppressions(&self) -> &'a [Suppression] {
        match *self {
            Self::Type(t) => &t.suppressions,
            Self::Property(p) => &p.suppressions,
            Self::Method(m) => &m.suppressions,
        }
    }
}

/// Read-only view of the host's symbol graph.
///
/// Implementations must be shareable across the worker threads of a pass.
pub trait SymbolGraph: Sync {
    /// Declared types to check.
    fn types(&self) -> &[TypeSymbol];

    /// Declared properties to check.
    fn properties(&self) -> &[PropertySymbol];

    /// Declared methods to check.
    fn methods(&self) -> &[MethodSymbol];

    /// Resolves a fully qualified type name, declared or referenced.
    fn resolve(&self, id: &str) -> Option<&TypeSymbol>;

    /// Resolves the direct base type of `ty`.
    fn base_of(&self, ty: &TypeSymbol) -> Option<&TypeSymbol> {
        ty.base.as_deref().and_then(|b| self.resolve(b))
    }

    /// Returns the containing namespace of `ty`.
    fn namespace_of<'a>(&'a self, ty: &'a TypeSymbol) -> Option<&'a str> {
        ty.namespace.as_deref()
    }
}

/// Errors when loading a symbol graph.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GraphError {
    /// Failed to read the graph file.
    #[error("Failed to read symbol graph {path}: {source}")]
    #[diagnostic(code(layer_lint::graph::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The graph is not valid JSON or does not match the schema.
    #[error("Failed to parse symbol graph: {message}")]
    #[diagnostic(
        code(layer_lint::graph::parse),
        help("expected an object with `types`, `references`, `properties` and `methods` arrays")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Declared(usize),
    Reference(usize),
}

#[derive(Debug, Default, Deserialize)]
struct TableDto {
    #[serde(default)]
    types: Vec<TypeSymbol>,
    #[serde(default)]
    references: Vec<TypeSymbol>,
    #[serde(default)]
    properties: Vec<PropertySymbol>,
    #[serde(default)]
    methods: Vec<MethodSymbol>,
}

/// In-memory [`SymbolGraph`].
///
/// `types` are declared in the analyzed code and get checked; `references`
/// are external types that only take part in resolution (base classes from
/// libraries, for example). When an id appears more than once the first
/// declared definition wins, and a declared definition always beats a
/// reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TableDto")]
pub struct SymbolTable {
    types: Vec<TypeSymbol>,
    references: Vec<TypeSymbol>,
    properties: Vec<PropertySymbol>,
    methods: Vec<MethodSymbol>,
    index: HashMap<String, Slot>,
}

impl From<TableDto> for SymbolTable {
    fn from(dto: TableDto) -> Self {
        let mut table = Self::new();
        for ty in dto.types {
            table.add_type(ty.infer_namespace());
        }
        for ty in dto.references {
            table.add_reference(ty.infer_namespace());
        }
        table.properties = dto.properties;
        table.methods = dto.methods;
        table
    }
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Parses a table from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(content: &str) -> Result<Self, GraphError> {
        serde_json::from_str(content).map_err(|e| GraphError::Parse {
            message: e.to_string(),
        })
    }

    /// Adds a declared type.
    pub fn add_type(&mut self, ty: TypeSymbol) {
        let slot = Slot::Declared(self.types.len());
        match self.index.get(&ty.id) {
            Some(Slot::Declared(_)) => {}
            _ => {
                self.index.insert(ty.id.clone(), slot);
            }
        }
        self.types.push(ty);
    }

    /// Adds an external type that is resolvable but never checked.
    pub fn add_reference(&mut self, ty: TypeSymbol) {
        let slot = Slot::Reference(self.references.len());
        self.index.entry(ty.id.clone()).or_insert(slot);
        self.references.push(ty);
    }

    /// Adds a declared type.
    #[must_use]
    pub fn with_type(mut self, ty: TypeSymbol) -> Self {
        self.add_type(ty);
        self
    }

    /// Adds an external type.
    #[must_use]
    pub fn with_reference(mut self, ty: TypeSymbol) -> Self {
        self.add_reference(ty);
        self
    }

    /// Adds a declared property.
    #[must_use]
    pub fn with_property(mut self, property: PropertySymbol) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a declared method.
    #[must_use]
    pub fn with_method(mut self, method: MethodSymbol) -> Self {
        self.methods.push(method);
        self
    }

    /// Total number of checkable symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.properties.len() + self.methods.len()
    }

    /// Returns true if there is nothing to check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolGraph for SymbolTable {
    fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    fn properties(&self) -> &[PropertySymbol] {
        &self.properties
    }

    fn methods(&self) -> &[MethodSymbol] {
        &self.methods
    }

    fn resolve(&self, id: &str) -> Option<&TypeSymbol> {
        match self.index.get(id)? {
            Slot::Declared(i) => self.types.get(*i),
            Slot::Reference(i) => self.references.get(*i),
        }
    }
}
