// crates/topology-rs-xml/src/parser/socket_bindings.rs

//! Socket binding groups.
//!
//! Revision 1.1 adds `<outbound-socket-binding>`; the two revisions otherwise
//! share the group grammar. Inbound and outbound bindings share one name scope
//! per group.

use super::{require_no_attributes, unexpected_element, AttributeValues, DomainParser};
use crate::builder::{add_child, emit, set_optional};
use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::resolver::NameRegistry;
use crate::stream::StartElement;
use topology_rs::{ModelValue, Operation, ResourceAddress};

/// Reads one `<socket-binding-group>` and appends its operations.
pub(crate) type SocketBindingGroupGrammar =
    fn(&mut DomainParser<'_, '_>, &StartElement, &mut Vec<Operation>) -> Result<(), DomainXmlError>;

impl<'a, 'r> DomainParser<'a, 'r> {
    pub(super) fn parse_socket_binding_groups(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        let grammar = self.grammar.socket_binding_group;
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::SocketBindingGroup {
                return Err(unexpected_element(&element));
            }
            grammar(self, &element, ops)?;
        }
        Ok(())
    }
}

pub(crate) fn parse_socket_binding_group_1_0(
    parser: &mut DomainParser<'_, '_>,
    element: &StartElement,
    ops: &mut Vec<Operation>,
) -> Result<(), DomainXmlError> {
    parse_socket_binding_group(parser, element, ops, false)
}

pub(crate) fn parse_socket_binding_group_1_1(
    parser: &mut DomainParser<'_, '_>,
    element: &StartElement,
    ops: &mut Vec<Operation>,
) -> Result<(), DomainXmlError> {
    parse_socket_binding_group(parser, element, ops, true)
}

fn parse_socket_binding_group(
    parser: &mut DomainParser<'_, '_>,
    element: &StartElement,
    ops: &mut Vec<Operation>,
    allow_outbound: bool,
) -> Result<(), DomainXmlError> {
    let attrs = AttributeValues::read(element, &[Attribute::Name, Attribute::DefaultInterface])?;
    attrs.require(&[Attribute::Name, Attribute::DefaultInterface])?;
    let name = attrs.required(Attribute::Name)?;
    let default_interface = attrs.required(Attribute::DefaultInterface)?;
    parser.names.socket_binding_groups.declare(name, element.location)?;
    let address = ResourceAddress::root().append("socket-binding-group", name);

    let mut includes = Vec::new();
    let mut included = NameRegistry::new("socket-binding-group include");
    let mut bindings = NameRegistry::new("socket-binding");
    let mut binding_ops = Vec::new();

    while let Some(child) = parser.next_domain_child()? {
        match Element::from_local_name(child.name()) {
            Element::Include => {
                if !bindings.is_empty() {
                    return Err(DomainXmlError::OutOfOrderElement {
                        name: child.local_name,
                        location: child.location,
                    });
                }
                let include_attrs = AttributeValues::read(&child, &[Attribute::SocketBindingGroup])?;
                let target = include_attrs.required(Attribute::SocketBindingGroup)?;
                parser
                    .names
                    .socket_binding_groups
                    .require_include(name, target, child.location)?;
                included.declare(target, child.location)?;
                parser.reader.require_no_content()?;
                includes.push(ModelValue::from(target));
            }
            Element::SocketBinding => {
                binding_ops.push(parse_socket_binding(parser, &child, &address, &mut bindings)?);
            }
            Element::OutboundSocketBinding if allow_outbound => {
                binding_ops.push(parse_outbound_socket_binding(parser, &child, &address, &mut bindings)?);
            }
            _ => return Err(unexpected_element(&child)),
        }
    }

    let group = Operation::add(address)
        .with_parameter("default-interface", default_interface)
        .with_parameter("includes", includes);
    emit(ops, group);
    for op in binding_ops {
        emit(ops, op);
    }
    Ok(())
}

fn parse_socket_binding(
    parser: &mut DomainParser<'_, '_>,
    element: &StartElement,
    group: &ResourceAddress,
    bindings: &mut NameRegistry,
) -> Result<Operation, DomainXmlError> {
    let attrs = AttributeValues::read(
        element,
        &[
            Attribute::Name,
            Attribute::Interface,
            Attribute::Port,
            Attribute::FixedPort,
            Attribute::MulticastAddress,
            Attribute::MulticastPort,
        ],
    )?;
    let name = attrs.required(Attribute::Name)?;
    bindings.declare(name, element.location)?;

    let mut op = add_child(group, "socket-binding", name);
    if let Some(interface) = attrs.get(Attribute::Interface) {
        parser.names.interfaces.require(interface, element.location)?;
        op.set_parameter("interface", interface);
    }
    set_optional(&mut op, "port", attrs.port(Attribute::Port)?);
    set_optional(&mut op, "fixed-port", attrs.boolean(Attribute::FixedPort)?);
    set_optional(&mut op, "multicast-address", attrs.get(Attribute::MulticastAddress));
    set_optional(&mut op, "multicast-port", attrs.port(Attribute::MulticastPort)?);
    parser.reader.require_no_content()?;
    Ok(op)
}

/// Reads an `<outbound-socket-binding>`, which names exactly one destination.
fn parse_outbound_socket_binding(
    parser: &mut DomainParser<'_, '_>,
    element: &StartElement,
    group: &ResourceAddress,
    bindings: &mut NameRegistry,
) -> Result<Operation, DomainXmlError> {
    let attrs = AttributeValues::read(
        element,
        &[
            Attribute::Name,
            Attribute::SourceInterface,
            Attribute::SourcePort,
            Attribute::FixedSourcePort,
        ],
    )?;
    let name = attrs.required(Attribute::Name)?;
    bindings.declare(name, element.location)?;
    if let Some(interface) = attrs.get(Attribute::SourceInterface) {
        parser.names.interfaces.require(interface, element.location)?;
    }

    let mut destination: Option<Operation> = None;
    while let Some(child) = parser.next_domain_child()? {
        if destination.is_some() {
            return Err(DomainXmlError::DuplicateElement {
                name: child.local_name,
                location: child.location,
            });
        }
        let op = match Element::from_local_name(child.name()) {
            Element::RemoteDestination => {
                let dest = AttributeValues::read(&child, &[Attribute::Host, Attribute::Port])?;
                dest.require(&[Attribute::Host, Attribute::Port])?;
                let mut op = add_child(group, "remote-destination-outbound-socket-binding", name)
                    .with_parameter("host", dest.required(Attribute::Host)?);
                set_optional(&mut op, "port", dest.port(Attribute::Port)?);
                op
            }
            Element::LocalDestination => {
                let dest = AttributeValues::read(&child, &[Attribute::SocketBindingRef])?;
                add_child(group, "local-destination-outbound-socket-binding", name)
                    .with_parameter("socket-binding-ref", dest.required(Attribute::SocketBindingRef)?)
            }
            _ => return Err(unexpected_element(&child)),
        };
        parser.reader.require_no_content()?;
        destination = Some(op);
    }

    let mut op = destination.ok_or_else(|| DomainXmlError::OutboundBindingWithoutDestination {
        binding: name.to_string(),
        location: element.location,
    })?;
    set_optional(&mut op, "source-interface", attrs.get(Attribute::SourceInterface));
    set_optional(&mut op, "source-port", attrs.port(Attribute::SourcePort)?);
    set_optional(&mut op, "fixed-source-port", attrs.boolean(Attribute::FixedSourcePort)?);
    Ok(op)
}
