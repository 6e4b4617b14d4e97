// crates/topology-rs-xml/src/parser/mod.rs

//! Reads a domain document into an ordered list of `add` operations.
//!
//! The reader is a single forward pass. The root `<domain>` element selects a
//! grammar by its namespace, then the top-level sections are read in their
//! fixed order. Every entity is validated as it is read: names are unique in
//! their scope and references must point at something declared earlier.

mod attributes;
mod common;
mod interfaces;
mod profiles;
mod server_groups;
pub(crate) mod socket_bindings;

pub(crate) use attributes::{require_no_attributes, AttributeValues};

use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::builder::emit;
use crate::namespace::{grammar_for, Grammar, XSI_NAMESPACE};
use crate::resolver::Registries;
use crate::stream::{StartElement, Tag, XmlStreamReader};
use crate::subsystem::SubsystemRegistry;
use log::{debug, info, trace};
use std::collections::BTreeMap;
use topology_rs::{ModelValue, Operation, ResourceAddress};

/// Top-level sections of the document, in the only order they may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Extensions,
    SystemProperties,
    Paths,
    Profiles,
    Interfaces,
    SocketBindingGroups,
    Deployments,
    ServerGroups,
}

impl Section {
    fn from_element(element: Element) -> Option<Section> {
        match element {
            Element::Extensions => Some(Section::Extensions),
            Element::SystemProperties => Some(Section::SystemProperties),
            Element::Paths => Some(Section::Paths),
            Element::Profiles => Some(Section::Profiles),
            Element::Interfaces => Some(Section::Interfaces),
            Element::SocketBindingGroups => Some(Section::SocketBindingGroups),
            Element::Deployments => Some(Section::Deployments),
            Element::ServerGroups => Some(Section::ServerGroups),
            _ => None,
        }
    }
}

/// State of one document read.
pub(crate) struct DomainParser<'a, 'r> {
    pub reader: XmlStreamReader<'a>,
    pub grammar: &'static Grammar,
    pub subsystems: &'r SubsystemRegistry,
    pub names: Registries,
}

/// Reads `input` and returns the operations that rebuild the topology it
/// describes, in document order.
///
/// Nothing is returned unless the whole document is valid.
pub fn load_domain_from_str(
    input: &str,
    subsystems: &SubsystemRegistry,
) -> Result<Vec<Operation>, DomainXmlError> {
    let mut reader = XmlStreamReader::new(input);
    let root = match reader.next_tag()? {
        Tag::Start(element) => element,
        Tag::End(location) | Tag::Eof(location) => {
            return Err(DomainXmlError::UnexpectedEof { location });
        }
    };
    if Element::from_local_name(root.name()) != Element::Domain {
        return Err(unexpected_element(&root));
    }
    let grammar = grammar_for(root.namespace.as_deref(), root.location)?;

    let mut parser = DomainParser {
        reader,
        grammar,
        subsystems,
        names: Registries::new(),
    };
    let mut ops = Vec::new();
    parser.parse_domain(&root, &mut ops)?;

    match parser.reader.next_tag()? {
        Tag::Eof(_) => {}
        Tag::Start(element) => return Err(unexpected_element(&element)),
        Tag::End(location) => return Err(DomainXmlError::UnexpectedContent { location }),
    }

    info!(
        "Read domain document ({}) into {} operations",
        grammar.version,
        ops.len()
    );
    Ok(ops)
}

impl<'a, 'r> DomainParser<'a, 'r> {
    fn parse_domain(&mut self, root: &StartElement, ops: &mut Vec<Operation>) -> Result<(), DomainXmlError> {
        let root_address = ResourceAddress::root();
        let mut declarations = Operation::add(root_address.clone());
        if !root.namespaces.is_empty() {
            let namespaces: BTreeMap<String, ModelValue> = root
                .namespaces
                .iter()
                .map(|ns| (ns.prefix.clone(), ModelValue::from(ns.uri.as_str())))
                .collect();
            declarations.set_parameter("namespaces", namespaces);
        }
        for attr in &root.attributes {
            let attribute = Attribute::from_local_name(&attr.local_name);
            if attr.namespace.as_deref() != Some(XSI_NAMESPACE) {
                return Err(DomainXmlError::UnexpectedAttribute {
                    name: attr.local_name.clone(),
                    location: root.location,
                });
            }
            match attribute {
                Attribute::SchemaLocation => {
                    let locations = parse_schema_locations(&attr.value, root)?;
                    declarations.set_parameter("schema-locations", locations);
                }
                Attribute::NoNamespaceSchemaLocation => {
                    debug!("Ignoring root attribute xsi:{}", attr.local_name);
                }
                _ => {
                    return Err(DomainXmlError::UnexpectedAttribute {
                        name: attr.local_name.clone(),
                        location: root.location,
                    });
                }
            }
        }
        if !declarations.parameters.is_empty() {
            emit(ops, declarations);
        }

        let mut next_allowed = Section::Extensions;
        while let Some(element) = self.next_domain_child()? {
            let Some(section) = Section::from_element(Element::from_local_name(element.name())) else {
                return Err(unexpected_element(&element));
            };
            if section < next_allowed {
                return Err(DomainXmlError::OutOfOrderElement {
                    name: element.local_name,
                    location: element.location,
                });
            }
            trace!("Reading section <{}> at {}", element.name(), element.location);
            match section {
                Section::Extensions => self.parse_extensions(&element, ops)?,
                Section::SystemProperties => self.parse_system_properties(&element, &root_address, ops)?,
                Section::Paths => self.parse_paths(&element, ops)?,
                Section::Profiles => self.parse_profiles(&element, ops)?,
                Section::Interfaces => self.parse_interfaces(&element, ops)?,
                Section::SocketBindingGroups => self.parse_socket_binding_groups(&element, ops)?,
                Section::Deployments => {
                    self.parse_deployments(&element, &root_address, common::DeploymentScope::Domain, ops)?
                }
                Section::ServerGroups => self.parse_server_groups(&element, ops)?,
            }
            next_allowed = match section {
                Section::Extensions => Section::SystemProperties,
                Section::SystemProperties => Section::Paths,
                Section::Paths => Section::Profiles,
                Section::Profiles => Section::Interfaces,
                Section::Interfaces => Section::SocketBindingGroups,
                Section::SocketBindingGroups => Section::Deployments,
                Section::Deployments => Section::ServerGroups,
                Section::ServerGroups => {
                    self.expect_no_more_sections()?;
                    break;
                }
            };
        }
        Ok(())
    }

    fn expect_no_more_sections(&mut self) -> Result<(), DomainXmlError> {
        match self.next_domain_child()? {
            None => Ok(()),
            Some(element) => match Section::from_element(Element::from_local_name(element.name())) {
                Some(_) => Err(DomainXmlError::OutOfOrderElement {
                    name: element.local_name,
                    location: element.location,
                }),
                None => Err(unexpected_element(&element)),
            },
        }
    }

    /// Returns the next child element, which must be in the document's
    /// namespace.
    pub(crate) fn next_domain_child(&mut self) -> Result<Option<StartElement>, DomainXmlError> {
        let Some(element) = self.reader.next_child()? else {
            return Ok(None);
        };
        if element.namespace.as_deref() != Some(self.grammar.version.uri()) {
            return Err(unexpected_element(&element));
        }
        Ok(Some(element))
    }
}

/// Splits `xsi:schemaLocation` into namespace/location pairs.
fn parse_schema_locations(value: &str, root: &StartElement) -> Result<ModelValue, DomainXmlError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(DomainXmlError::InvalidAttributeValue {
            attribute: Attribute::SchemaLocation.local_name(),
            value: value.to_string(),
            location: root.location,
        });
    }
    let locations: BTreeMap<String, ModelValue> = tokens
        .chunks(2)
        .map(|pair| (pair[0].to_string(), ModelValue::from(pair[1])))
        .collect();
    Ok(ModelValue::Object(locations))
}

pub(crate) fn unexpected_element(element: &StartElement) -> DomainXmlError {
    DomainXmlError::UnexpectedElement {
        name: element.local_name.clone(),
        location: element.location,
    }
}

/// Fails with `DuplicateElement` if `element` was already seen among its
/// siblings.
pub(crate) fn first_occurrence(
    seen: &mut Vec<Element>,
    element: &StartElement,
) -> Result<Element, DomainXmlError> {
    let kind = Element::from_local_name(element.name());
    if seen.contains(&kind) {
        return Err(DomainXmlError::DuplicateElement {
            name: element.local_name.clone(),
            location: element.location,
        });
    }
    seen.push(kind);
    Ok(kind)
}
