//! Namespace-family membership over inheritance chains.
//!
//! A type belongs to the forbidden family when its own namespace, or the
//! namespace of any ancestor reached by following base types, matches the
//! family. Walks are explicit loops bounded by a maximum depth; a walk that
//! hits the bound or revisits a type fails closed (not a member).

use crate::config::ConfigError;
use crate::symbols::{SymbolGraph, TypeSymbol};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a namespace is compared with the family prefix. Always case-sensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// `Csla` matches `Csla` and `Csla.Core` but not `CslaExtensions`.
    #[default]
    Segment,
    /// Plain string prefix: `Csla` also matches `CslaExtensions`.
    Prefix,
}

/// A validated forbidden namespace family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceFamily {
    prefix: String,
    mode: MatchMode,
}

impl NamespaceFamily {
    /// Creates a family from a namespace prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the prefix is empty or blank.
    pub fn new(prefix: impl Into<String>, mode: MatchMode) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "forbidden namespace family must not be empty".to_string(),
            ));
        }
        Ok(Self { prefix, mode })
    }

    /// The configured prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// The configured match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether `namespace` is inside the family.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        match self.mode {
            MatchMode::Prefix => namespace.starts_with(&self.prefix),
            MatchMode::Segment => namespace
                .strip_prefix(&self.prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.')),
        }
    }
}

impl std::fmt::Display for NamespaceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix)
    }
}

/// Where a type's base chain leads, independent of any walk bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// The family is reached this many base steps up (0 = the type itself).
    Member(usize),
    /// The chain ends without reaching the family.
    Outside,
}

/// Outcome of one bounded walk.
enum Walk {
    Reached(Reach),
    Bounded,
    Cyclic,
}

/// Membership predicate bound to one graph and one family for one pass.
///
/// A type is a member when it, or an ancestor at most `max_depth` base steps
/// up, is inside the family. The cache records each visited type's distance
/// to the family rather than the verdict of the walk that visited it, so
/// answers do not depend on query order. Rules running on different worker
/// threads share ancestor-chain work through it. Drop it with the pass.
pub struct Membership<'g> {
    graph: &'g dyn SymbolGraph,
    family: &'g NamespaceFamily,
    max_depth: usize,
    cache: DashMap<String, Reach>,
}

impl<'g> Membership<'g> {
    /// Creates a predicate over `graph`.
    #[must_use]
    pub fn new(graph: &'g dyn SymbolGraph, family: &'g NamespaceFamily, max_depth: usize) -> Self {
        Self {
            graph,
            family,
            max_depth,
            cache: DashMap::new(),
        }
    }

    /// The graph being checked.
    #[must_use]
    pub fn graph(&self) -> &'g dyn SymbolGraph {
        self.graph
    }

    /// The forbidden family.
    #[must_use]
    pub fn family(&self) -> &'g NamespaceFamily {
        self.family
    }

    /// Number of memoized type ids.
    #[must_use]
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a declared type reference, logging unresolved ones.
    #[must_use]
    pub fn resolve(&self, id: Option<&str>) -> Option<&'g TypeSymbol> {
        let graph = self.graph;
        let id = id?;
        let resolved = graph.resolve(id);
        if resolved.is_none() {
            debug!("Unresolved type reference `{}` treated as non-member", id);
        }
        resolved
    }

    fn in_family(&self, ty: &TypeSymbol) -> bool {
        self.graph
            .namespace_of(ty)
            .is_some_and(|ns| self.family.contains(ns))
    }

    /// Follows the base chain of `start` for at most `max_depth` steps.
    ///
    /// Every type visited on a walk that reaches a conclusion is memoized
    /// with its own distance to the family. Cut-off and cyclic walks leave
    /// the cache untouched.
    fn walk(&self, start: &TypeSymbol) -> Walk {
        let graph = self.graph;
        let mut visited: Vec<&str> = Vec::new();
        let mut current = Some(start);

        let reach = loop {
            let Some(ty) = current else {
                break Reach::Outside;
            };
            if let Some(hit) = self.cache.get(ty.id.as_str()) {
                break match *hit {
                    Reach::Member(distance) => Reach::Member(visited.len() + distance),
                    Reach::Outside => Reach::Outside,
                };
            }
            if visited.contains(&ty.id.as_str()) {
                return Walk::Cyclic;
            }
            if visited.len() > self.max_depth {
                return Walk::Bounded;
            }
            visited.push(&ty.id);
            if self.in_family(ty) {
                break Reach::Member(visited.len() - 1);
            }
            current = graph.base_of(ty);
        };

        for (step, id) in visited.iter().enumerate() {
            let own = match reach {
                Reach::Member(distance) => Reach::Member(distance - step),
                Reach::Outside => Reach::Outside,
            };
            self.cache.insert((*id).to_string(), own);
        }
        Walk::Reached(reach)
    }

    /// Distance from `ty` to the family, if it is within the bound.
    fn distance(&self, ty: &TypeSymbol, offset: usize) -> Option<usize> {
        match self.walk(ty) {
            Walk::Reached(Reach::Member(distance)) if distance + offset <= self.max_depth => {
                Some(distance)
            }
            Walk::Reached(Reach::Outside) => None,
            Walk::Reached(Reach::Member(_)) | Walk::Bounded => {
                warn!(
                    "Inheritance chain of `{}` is deeper than {}; treating as non-member",
                    ty.id, self.max_depth
                );
                None
            }
            Walk::Cyclic => {
                warn!(
                    "Inheritance chain of `{}` is cyclic; treating as non-member",
                    ty.id
                );
                None
            }
        }
    }

    /// Whether `ty` or any of its ancestors belongs to the family.
    ///
    /// An absent type is never a member.
    #[must_use]
    pub fn belongs(&self, ty: Option<&TypeSymbol>) -> bool {
        ty.is_some_and(|ty| self.distance(ty, 0).is_some())
    }

    /// Resolves `id` and tests it with [`Membership::belongs`].
    #[must_use]
    pub fn belongs_id(&self, id: Option<&str>) -> bool {
        self.belongs(self.resolve(id))
    }

    /// Returns the nearest ancestor of `ty` (excluding `ty` itself) whose
    /// namespace is inside the family.
    ///
    /// Uses the same bound as [`Membership::belongs`]: for a type outside the
    /// family, this is `Some` exactly when `belongs` is true.
    #[must_use]
    pub fn first_forbidden_ancestor(&self, ty: &TypeSymbol) -> Option<&'g TypeSymbol> {
        let graph = self.graph;
        let base = graph.base_of(ty)?;
        let distance = self.distance(base, 1)?;

        let mut hit = base;
        for _ in 0..distance {
            hit = graph.base_of(hit)?;
        }
        (hit.id != ty.id).then_some(hit)
    }
}
