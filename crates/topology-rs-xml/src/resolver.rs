// crates/topology-rs-xml/src/resolver.rs

//! Name-uniqueness scopes and reference checks for a single document read.
//!
//! Registries are created fresh for every read and dropped with it. A name can
//! only be referenced after it has been declared, so every check is local to
//! the single pass over the document.

use crate::error::DomainXmlError;
use crate::stream::Location;
use std::collections::BTreeSet;

/// The set of names declared in one scope.
#[derive(Debug)]
pub(crate) struct NameRegistry {
    kind: &'static str,
    names: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            names: BTreeSet::new(),
        }
    }

    /// Declares `name`, failing if it is already declared in this scope.
    pub fn declare(&mut self, name: &str, location: Location) -> Result<(), DomainXmlError> {
        if !self.names.insert(name.to_string()) {
            return Err(DomainXmlError::DuplicateDeclaration {
                kind: self.kind,
                name: name.to_string(),
                location,
            });
        }
        Ok(())
    }

    /// Checks that `name` has been declared, without declaring it.
    pub fn require(&self, name: &str, location: Location) -> Result<(), DomainXmlError> {
        if !self.contains(name) {
            return Err(DomainXmlError::UnresolvedReference {
                kind: self.kind,
                name: name.to_string(),
                location,
            });
        }
        Ok(())
    }

    /// Checks an include of `included` from the entity `owner` of the same kind.
    ///
    /// The owner is usually declared already (for uniqueness), so self-inclusion
    /// is rejected explicitly.
    pub fn require_include(
        &self,
        owner: &str,
        included: &str,
        location: Location,
    ) -> Result<(), DomainXmlError> {
        if owner == included {
            return Err(DomainXmlError::SelfReference {
                kind: self.kind,
                name: included.to_string(),
                location,
            });
        }
        self.require(included, location)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Document-wide scopes.
///
/// System properties are scoped to their `<system-properties>` element, which
/// appears at most once per owner, so their registry lives in that grammar.
#[derive(Debug)]
pub(crate) struct Registries {
    pub extensions: NameRegistry,
    pub paths: NameRegistry,
    pub profiles: NameRegistry,
    pub interfaces: NameRegistry,
    pub socket_binding_groups: NameRegistry,
    pub deployments: NameRegistry,
    pub server_groups: NameRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            extensions: NameRegistry::new("extension"),
            paths: NameRegistry::new("path"),
            profiles: NameRegistry::new("profile"),
            interfaces: NameRegistry::new("interface"),
            socket_binding_groups: NameRegistry::new("socket-binding-group"),
            deployments: NameRegistry::new("deployment"),
            server_groups: NameRegistry::new("server-group"),
        }
    }
}
