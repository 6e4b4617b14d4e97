// crates/topology-rs-xml/src/parser/server_groups.rs

//! Server groups and their JVM settings.

use super::common::DeploymentScope;
use super::{first_occurrence, require_no_attributes, unexpected_element, AttributeValues, DomainParser};
use crate::builder::{add_child, emit, set_optional};
use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::resolver::NameRegistry;
use crate::stream::StartElement;
use std::collections::BTreeMap;
use topology_rs::{ModelValue, Operation, ResourceAddress};

impl<'a, 'r> DomainParser<'a, 'r> {
    pub(super) fn parse_server_groups(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::ServerGroup {
                return Err(unexpected_element(&element));
            }
            self.parse_server_group(&element, ops)?;
        }
        Ok(())
    }

    /// Reads one `<server-group>`.
    ///
    /// The socket binding group reference is folded into the group's own
    /// operation, so children are collected first and appended after it.
    fn parse_server_group(&mut self, element: &StartElement, ops: &mut Vec<Operation>) -> Result<(), DomainXmlError> {
        let attrs = AttributeValues::read(element, self.grammar.server_group_attributes)?;
        attrs.require(&[Attribute::Name, Attribute::Profile])?;
        let name = attrs.required(Attribute::Name)?;
        let profile = attrs.required(Attribute::Profile)?;
        self.names.server_groups.declare(name, element.location)?;
        self.names.profiles.require(profile, element.location)?;

        let address = ResourceAddress::root().append("server-group", name);
        let mut group = Operation::add(address.clone()).with_parameter("profile", profile);
        set_optional(
            &mut group,
            "management-subsystem-endpoint",
            attrs.boolean(Attribute::ManagementSubsystemEndpoint)?,
        );

        let mut children = Vec::new();
        let mut seen = Vec::new();
        while let Some(child) = self.next_domain_child()? {
            match first_occurrence(&mut seen, &child)? {
                Element::Jvm => children.push(self.parse_jvm(&child, &address)?),
                Element::SocketBindingGroup => {
                    let sbg = AttributeValues::read(&child, &[Attribute::Ref, Attribute::PortOffset])?;
                    let reference = sbg.required(Attribute::Ref)?;
                    self.names.socket_binding_groups.require(reference, child.location)?;
                    group.set_parameter("socket-binding-group", reference);
                    set_optional(&mut group, "socket-binding-port-offset", sbg.int(Attribute::PortOffset)?);
                    self.reader.require_no_content()?;
                }
                Element::Deployments => {
                    self.parse_deployments(&child, &address, DeploymentScope::ServerGroup, &mut children)?
                }
                Element::SystemProperties => self.parse_system_properties(&child, &address, &mut children)?,
                _ => return Err(unexpected_element(&child)),
            }
        }

        emit(ops, group);
        for op in children {
            emit(ops, op);
        }
        Ok(())
    }

    /// Reads a `<jvm>` element into a single operation under `owner`.
    fn parse_jvm(&mut self, element: &StartElement, owner: &ResourceAddress) -> Result<Operation, DomainXmlError> {
        let attrs = AttributeValues::read(
            element,
            &[
                Attribute::Name,
                Attribute::JavaHome,
                Attribute::Type,
                Attribute::DebugEnabled,
                Attribute::DebugOptions,
            ],
        )?;
        let name = attrs.required(Attribute::Name)?;
        let mut op = add_child(owner, "jvm", name);
        set_optional(&mut op, "java-home", attrs.get(Attribute::JavaHome));
        set_optional(&mut op, "type", attrs.get(Attribute::Type));
        set_optional(&mut op, "debug-enabled", attrs.boolean(Attribute::DebugEnabled)?);
        set_optional(&mut op, "debug-options", attrs.get(Attribute::DebugOptions));

        let mut seen = Vec::new();
        while let Some(child) = self.next_domain_child()? {
            match first_occurrence(&mut seen, &child)? {
                Element::Heap => self.parse_sizes(&child, &mut op, "heap-size", "max-heap-size")?,
                Element::Permgen => self.parse_sizes(&child, &mut op, "permgen-size", "max-permgen-size")?,
                Element::Stack => {
                    let stack = AttributeValues::read(&child, &[Attribute::Size])?;
                    set_optional(&mut op, "stack-size", stack.get(Attribute::Size));
                    self.reader.require_no_content()?;
                }
                Element::JvmOptions => {
                    require_no_attributes(&child)?;
                    op.set_parameter("jvm-options", self.parse_jvm_options()?);
                }
                Element::EnvironmentVariables => {
                    require_no_attributes(&child)?;
                    op.set_parameter("environment-variables", self.parse_environment_variables()?);
                }
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(op)
    }

    fn parse_sizes(
        &mut self,
        element: &StartElement,
        op: &mut Operation,
        size: &str,
        max_size: &str,
    ) -> Result<(), DomainXmlError> {
        let attrs = AttributeValues::read(element, &[Attribute::Size, Attribute::MaxSize])?;
        set_optional(op, size, attrs.get(Attribute::Size));
        set_optional(op, max_size, attrs.get(Attribute::MaxSize));
        self.reader.require_no_content()
    }

    fn parse_jvm_options(&mut self) -> Result<ModelValue, DomainXmlError> {
        let mut options = Vec::new();
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Option {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(&element, &[Attribute::Value])?;
            options.push(ModelValue::from(attrs.required(Attribute::Value)?));
            self.reader.require_no_content()?;
        }
        Ok(ModelValue::List(options))
    }

    fn parse_environment_variables(&mut self) -> Result<ModelValue, DomainXmlError> {
        let mut declared = NameRegistry::new("environment variable");
        let mut variables = BTreeMap::new();
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Variable {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(&element, &[Attribute::Name, Attribute::Value])?;
            attrs.require(&[Attribute::Name, Attribute::Value])?;
            let name = attrs.required(Attribute::Name)?;
            declared.declare(name, element.location)?;
            variables.insert(name.to_string(), ModelValue::from(attrs.required(Attribute::Value)?));
            self.reader.require_no_content()?;
        }
        Ok(ModelValue::Object(variables))
    }
}
