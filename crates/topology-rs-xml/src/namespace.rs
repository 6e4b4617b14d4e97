// crates/topology-rs-xml/src/namespace.rs

//! Schema revisions and the grammar variant each one selects.

use crate::element::Attribute;
use crate::error::DomainXmlError;
use crate::parser::socket_bindings::{self, SocketBindingGroupGrammar};
use crate::stream::Location;
use core::fmt;
use log::debug;

/// Namespace of `xsi:schemaLocation` and `xsi:noNamespaceSchemaLocation`.
pub(crate) const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The supported revisions of the domain schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    Domain1_0,
    Domain1_1,
}

impl SchemaVersion {
    /// The revision every write produces.
    pub const CURRENT: SchemaVersion = SchemaVersion::Domain1_1;

    pub fn from_uri(uri: &str) -> Option<SchemaVersion> {
        match uri {
            "urn:jboss:domain:1.0" => Some(SchemaVersion::Domain1_0),
            "urn:jboss:domain:1.1" => Some(SchemaVersion::Domain1_1),
            _ => None,
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            SchemaVersion::Domain1_0 => "urn:jboss:domain:1.0",
            SchemaVersion::Domain1_1 => "urn:jboss:domain:1.1",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// The per-revision differences of the document grammar.
///
/// Everything not listed here (section order, profiles, interfaces,
/// deployments) is shared by all revisions.
#[derive(Debug)]
pub(crate) struct Grammar {
    pub version: SchemaVersion,
    /// Attributes accepted on `<server-group>`.
    pub server_group_attributes: &'static [Attribute],
    /// Entity grammar for `<socket-binding-group>`.
    pub socket_binding_group: SocketBindingGroupGrammar,
}

const SERVER_GROUP_ATTRIBUTES_1_0: &[Attribute] = &[Attribute::Name, Attribute::Profile];

const SERVER_GROUP_ATTRIBUTES_1_1: &[Attribute] = &[
    Attribute::Name,
    Attribute::Profile,
    Attribute::ManagementSubsystemEndpoint,
];

static GRAMMARS: [Grammar; 2] = [
    Grammar {
        version: SchemaVersion::Domain1_0,
        server_group_attributes: SERVER_GROUP_ATTRIBUTES_1_0,
        socket_binding_group: socket_bindings::parse_socket_binding_group_1_0,
    },
    Grammar {
        version: SchemaVersion::Domain1_1,
        server_group_attributes: SERVER_GROUP_ATTRIBUTES_1_1,
        socket_binding_group: socket_bindings::parse_socket_binding_group_1_1,
    },
];

/// Selects the grammar for a document's root namespace.
pub(crate) fn grammar_for(
    namespace: Option<&str>,
    location: Location,
) -> Result<&'static Grammar, DomainXmlError> {
    let version = namespace.and_then(SchemaVersion::from_uri).ok_or_else(|| {
        DomainXmlError::UnsupportedNamespace {
            namespace: namespace.map(str::to_string),
            location,
        }
    })?;
    let grammar = GRAMMARS
        .iter()
        .find(|g| g.version == version)
        .ok_or(DomainXmlError::UnsupportedNamespace {
            namespace: Some(version.uri().to_string()),
            location,
        })?;
    debug!("Selected grammar for schema {}", version);
    Ok(grammar)
}
