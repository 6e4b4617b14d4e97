// crates/topology-rs-xml/src/parser/profiles.rs

//! Profiles and the delegation of their `<subsystem>` elements.

use super::{require_no_attributes, unexpected_element, AttributeValues, DomainParser};
use crate::builder::{emit, reparent};
use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::resolver::NameRegistry;
use crate::stream::StartElement;
use crate::subsystem::subsystem_name;
use log::debug;
use topology_rs::{ModelValue, Operation, ResourceAddress};

impl<'a, 'r> DomainParser<'a, 'r> {
    pub(super) fn parse_profiles(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Profile {
                return Err(unexpected_element(&element));
            }
            self.parse_profile(&element, ops)?;
        }
        Ok(())
    }

    /// Reads one `<profile>`: includes first, then at least one subsystem.
    ///
    /// The profile's own operation is emitted before the operations of its
    /// subsystems, which are re-addressed under the profile.
    fn parse_profile(&mut self, element: &StartElement, ops: &mut Vec<Operation>) -> Result<(), DomainXmlError> {
        let attrs = AttributeValues::read(element, &[Attribute::Name])?;
        let name = attrs.required(Attribute::Name)?;
        self.names.profiles.declare(name, element.location)?;
        let address = ResourceAddress::root().append("profile", name);

        let mut includes = Vec::new();
        let mut included = NameRegistry::new("profile include");
        let mut namespaces = NameRegistry::new("subsystem namespace");
        let mut subsystems = NameRegistry::new("subsystem");
        let mut subsystem_ops = Vec::new();

        while let Some(child) = self.reader.next_child()? {
            if child.namespace.as_deref() == Some(self.grammar.version.uri()) {
                if Element::from_local_name(child.name()) != Element::Include {
                    return Err(unexpected_element(&child));
                }
                if !namespaces.is_empty() {
                    return Err(DomainXmlError::OutOfOrderElement {
                        name: child.local_name,
                        location: child.location,
                    });
                }
                let include_attrs = AttributeValues::read(&child, &[Attribute::Profile])?;
                let target = include_attrs.required(Attribute::Profile)?;
                self.names.profiles.require_include(name, target, child.location)?;
                included.declare(target, child.location)?;
                self.reader.require_no_content()?;
                includes.push(ModelValue::from(target));
                continue;
            }

            if Element::from_local_name(child.name()) != Element::Subsystem {
                return Err(unexpected_element(&child));
            }
            let Some(namespace) = child.namespace.as_deref() else {
                return Err(unexpected_element(&child));
            };
            namespaces.declare(namespace, child.location)?;
            let registry = self.subsystems;
            let parser = registry
                .parser(namespace)
                .ok_or_else(|| DomainXmlError::UnknownSubsystem {
                    namespace: namespace.to_string(),
                    location: child.location,
                })?;
            debug!("Delegating <subsystem xmlns=\"{}\"> in profile '{}'", namespace, name);
            let relative = parser.parse(&mut self.reader, &child)?;
            // The delegate must produce the subsystem resource itself first.
            let Some(subsystem) = relative
                .first()
                .filter(|op| op.address.len() == 1)
                .and_then(|op| subsystem_name(&op.address))
            else {
                return Err(unexpected_element(&child));
            };
            subsystems.declare(subsystem, child.location)?;
            subsystem_ops.extend(reparent(relative, &address));
        }

        if namespaces.is_empty() {
            return Err(DomainXmlError::ProfileHasNoSubsystems {
                profile: name.to_string(),
                location: element.location,
            });
        }

        emit(ops, Operation::add(address).with_parameter("includes", includes));
        for op in subsystem_ops {
            emit(ops, op);
        }
        Ok(())
    }
}
