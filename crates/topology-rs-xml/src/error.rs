// crates/topology-rs-xml/src/error.rs

use crate::stream::Location;
use core::fmt;
use topology_rs::TopologyError;

/// Broad class of a `DomainXmlError`, for callers that only need to know what
/// kind of problem a document has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input is not well-formed XML.
    Syntax,
    /// Unexpected, misplaced, missing or malformed elements and attributes.
    Structural,
    /// A name was declared twice within one scope.
    Uniqueness,
    /// A reference names something that was not declared earlier.
    Reference,
    /// An entity lacks mandatory content.
    Completeness,
    /// The document's schema revision is not supported.
    Version,
    /// The resource tree could not be built or is missing data.
    Model,
    /// The output sink failed.
    Write,
}

/// Errors that can occur while reading or writing a domain document.
///
/// Every error is fatal to the call that raised it.
#[derive(Debug)]
pub enum DomainXmlError {
    /// An error from the underlying `quick-xml` reader.
    Xml(quick_xml::Error),

    /// An I/O error from the underlying `quick-xml` writer.
    Io(std::io::Error),

    /// Text content where only elements are allowed.
    UnexpectedContent { location: Location },

    /// The document ended inside an open element.
    UnexpectedEof { location: Location },

    /// An element that the grammar does not allow at this point.
    UnexpectedElement { name: String, location: Location },

    /// A known section element that appears after a later section.
    OutOfOrderElement { name: String, location: Location },

    /// A child element that may appear at most once was repeated.
    DuplicateElement { name: String, location: Location },

    /// An attribute the element does not accept.
    UnexpectedAttribute { name: String, location: Location },

    /// The same attribute was given twice on one element.
    DuplicateAttribute { name: String, location: Location },

    /// One or more required attributes were missing.
    MissingRequiredAttribute {
        attributes: Vec<&'static str>,
        location: Location,
    },

    /// An attribute value could not be parsed.
    InvalidAttributeValue {
        attribute: &'static str,
        value: String,
        location: Location,
    },

    /// The document's root namespace is not a supported schema revision.
    UnsupportedNamespace {
        namespace: Option<String>,
        location: Location,
    },

    /// A `<subsystem>` element whose namespace has no registered parser.
    UnknownSubsystem { namespace: String, location: Location },

    /// A name was already declared in its scope.
    DuplicateDeclaration {
        kind: &'static str,
        name: String,
        location: Location,
    },

    /// A reference to a name that is not declared (yet) in its scope.
    UnresolvedReference {
        kind: &'static str,
        name: String,
        location: Location,
    },

    /// An entity includes itself.
    SelfReference {
        kind: &'static str,
        name: String,
        location: Location,
    },

    /// A profile declares no subsystem.
    ProfileHasNoSubsystems { profile: String, location: Location },

    /// A domain deployment declares no content item.
    DeploymentHasNoContent { deployment: String, location: Location },

    /// An outbound socket binding declares no destination.
    OutboundBindingWithoutDestination { binding: String, location: Location },

    /// The resource tree handed to the writer lacks a mandatory attribute.
    MissingModelAttribute { address: String, attribute: &'static str },

    /// The operation list could not be materialized into a resource tree.
    Model(TopologyError),
}

impl DomainXmlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Xml(_) => ErrorCategory::Syntax,
            Self::Io(_) => ErrorCategory::Write,
            Self::UnexpectedContent { .. }
            | Self::UnexpectedEof { .. }
            | Self::UnexpectedElement { .. }
            | Self::OutOfOrderElement { .. }
            | Self::DuplicateElement { .. }
            | Self::UnexpectedAttribute { .. }
            | Self::DuplicateAttribute { .. }
            | Self::MissingRequiredAttribute { .. }
            | Self::InvalidAttributeValue { .. }
            | Self::UnknownSubsystem { .. } => ErrorCategory::Structural,
            Self::DuplicateDeclaration { .. } => ErrorCategory::Uniqueness,
            Self::UnresolvedReference { .. } | Self::SelfReference { .. } => {
                ErrorCategory::Reference
            }
            Self::ProfileHasNoSubsystems { .. }
            | Self::DeploymentHasNoContent { .. }
            | Self::OutboundBindingWithoutDestination { .. } => ErrorCategory::Completeness,
            Self::UnsupportedNamespace { .. } => ErrorCategory::Version,
            Self::MissingModelAttribute { .. } | Self::Model(_) => ErrorCategory::Model,
        }
    }

    /// Input position of the error, when it came from a document.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::UnexpectedContent { location }
            | Self::UnexpectedEof { location }
            | Self::UnexpectedElement { location, .. }
            | Self::OutOfOrderElement { location, .. }
            | Self::DuplicateElement { location, .. }
            | Self::UnexpectedAttribute { location, .. }
            | Self::DuplicateAttribute { location, .. }
            | Self::MissingRequiredAttribute { location, .. }
            | Self::InvalidAttributeValue { location, .. }
            | Self::UnsupportedNamespace { location, .. }
            | Self::UnknownSubsystem { location, .. }
            | Self::DuplicateDeclaration { location, .. }
            | Self::UnresolvedReference { location, .. }
            | Self::SelfReference { location, .. }
            | Self::ProfileHasNoSubsystems { location, .. }
            | Self::DeploymentHasNoContent { location, .. }
            | Self::OutboundBindingWithoutDestination { location, .. } => Some(*location),
            Self::Xml(_) | Self::Io(_) | Self::MissingModelAttribute { .. } | Self::Model(_) => {
                None
            }
        }
    }
}

impl From<quick_xml::Error> for DomainXmlError {
    fn from(e: quick_xml::Error) -> Self {
        DomainXmlError::Xml(e)
    }
}

impl From<quick_xml::events::attributes::AttrError> for DomainXmlError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DomainXmlError::Xml(e.into())
    }
}

impl From<std::io::Error> for DomainXmlError {
    fn from(e: std::io::Error) -> Self {
        DomainXmlError::Io(e)
    }
}

impl From<TopologyError> for DomainXmlError {
    fn from(e: TopologyError) -> Self {
        DomainXmlError::Model(e)
    }
}

impl fmt::Display for DomainXmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML parsing error: {}", e),
            Self::Io(e) => write!(f, "XML writing error: {}", e),
            Self::UnexpectedContent { location } => {
                write!(f, "Unexpected text content at {}", location)
            }
            Self::UnexpectedEof { location } => {
                write!(f, "Unexpected end of document at {}", location)
            }
            Self::UnexpectedElement { name, location } => {
                write!(f, "Unexpected element '{}' at {}", name, location)
            }
            Self::OutOfOrderElement { name, location } => {
                write!(f, "Element '{}' is out of order at {}", name, location)
            }
            Self::DuplicateElement { name, location } => {
                write!(f, "Element '{}' already defined at {}", name, location)
            }
            Self::UnexpectedAttribute { name, location } => {
                write!(f, "Unexpected attribute '{}' at {}", name, location)
            }
            Self::DuplicateAttribute { name, location } => {
                write!(f, "Duplicate attribute '{}' at {}", name, location)
            }
            Self::MissingRequiredAttribute {
                attributes,
                location,
            } => write!(
                f,
                "Missing required attribute(s): {} at {}",
                attributes.join(", "),
                location
            ),
            Self::InvalidAttributeValue {
                attribute,
                value,
                location,
            } => write!(
                f,
                "Invalid value '{}' for attribute '{}' at {}",
                value, attribute, location
            ),
            Self::UnsupportedNamespace {
                namespace,
                location,
            } => write!(
                f,
                "Unsupported schema namespace '{}' at {}",
                namespace.as_deref().unwrap_or(""),
                location
            ),
            Self::UnknownSubsystem {
                namespace,
                location,
            } => write!(
                f,
                "No parser registered for subsystem namespace '{}' at {}",
                namespace, location
            ),
            Self::DuplicateDeclaration {
                kind,
                name,
                location,
            } => write!(f, "Duplicate {} '{}' at {}", kind, name, location),
            Self::UnresolvedReference {
                kind,
                name,
                location,
            } => write!(f, "Reference to undeclared {} '{}' at {}", kind, name, location),
            Self::SelfReference {
                kind,
                name,
                location,
            } => write!(f, "The {} '{}' includes itself at {}", kind, name, location),
            Self::ProfileHasNoSubsystems { profile, location } => write!(
                f,
                "Profile '{}' declares no subsystems at {}",
                profile, location
            ),
            Self::DeploymentHasNoContent {
                deployment,
                location,
            } => write!(
                f,
                "Deployment '{}' declares no content at {}",
                deployment, location
            ),
            Self::OutboundBindingWithoutDestination { binding, location } => write!(
                f,
                "Outbound socket binding '{}' declares no destination at {}",
                binding, location
            ),
            Self::MissingModelAttribute { address, attribute } => write!(
                f,
                "Resource {} is missing required attribute '{}'",
                address, attribute
            ),
            Self::Model(e) => write!(f, "Model error: {}", e),
        }
    }
}

impl std::error::Error for DomainXmlError {}
