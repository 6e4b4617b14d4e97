// crates/topology-rs-xml/src/parser/common.rs

//! Extensions, system properties, paths and deployments.
//!
//! System properties and deployments are read both at domain level and inside
//! a server group, with the same entity grammar.

use super::{require_no_attributes, unexpected_element, AttributeValues, DomainParser};
use crate::builder::{add_child, emit, set_optional};
use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::resolver::NameRegistry;
use crate::stream::StartElement;
use std::collections::BTreeMap;
use topology_rs::{ModelValue, Operation, ResourceAddress};

/// Length in bytes of a content hash.
const SHA1_LENGTH: usize = 20;

/// Where a `<deployments>` element appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeploymentScope {
    /// Declares deployment content for the whole domain.
    Domain,
    /// Maps domain deployments onto a server group.
    ServerGroup,
}

impl<'a, 'r> DomainParser<'a, 'r> {
    pub(super) fn parse_extensions(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        let root = ResourceAddress::root();
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Extension {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(&element, &[Attribute::Module])?;
            let module = attrs.required(Attribute::Module)?;
            self.names.extensions.declare(module, element.location)?;
            self.reader.require_no_content()?;
            emit(ops, add_child(&root, "extension", module));
        }
        Ok(())
    }

    /// Reads `<system-properties>` owned by `owner`.
    pub(super) fn parse_system_properties(
        &mut self,
        section: &StartElement,
        owner: &ResourceAddress,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        let mut declared = NameRegistry::new("system property");
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Property {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(
                &element,
                &[Attribute::Name, Attribute::Value, Attribute::BootTime],
            )?;
            let name = attrs.required(Attribute::Name)?;
            declared.declare(name, element.location)?;
            let mut op = add_child(owner, "system-property", name);
            set_optional(&mut op, "value", attrs.get(Attribute::Value));
            set_optional(&mut op, "boot-time", attrs.boolean(Attribute::BootTime)?);
            self.reader.require_no_content()?;
            emit(ops, op);
        }
        Ok(())
    }

    pub(super) fn parse_paths(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        let root = ResourceAddress::root();
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Path {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(
                &element,
                &[Attribute::Name, Attribute::Path, Attribute::RelativeTo],
            )?;
            let name = attrs.required(Attribute::Name)?;
            self.names.paths.declare(name, element.location)?;
            let mut op = add_child(&root, "path", name);
            set_optional(&mut op, "path", attrs.get(Attribute::Path));
            set_optional(&mut op, "relative-to", attrs.get(Attribute::RelativeTo));
            self.reader.require_no_content()?;
            emit(ops, op);
        }
        Ok(())
    }

    /// Reads `<deployments>` owned by `owner`.
    ///
    /// Domain deployments must carry at least one content item. Server-group
    /// deployments must name a domain deployment and carry no content.
    pub(super) fn parse_deployments(
        &mut self,
        section: &StartElement,
        owner: &ResourceAddress,
        scope: DeploymentScope,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        let mut mapped = NameRegistry::new("deployment");
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Deployment {
                return Err(unexpected_element(&element));
            }
            let allowed: &[Attribute] = match scope {
                DeploymentScope::Domain => &[Attribute::Name, Attribute::RuntimeName],
                DeploymentScope::ServerGroup => &[Attribute::Name, Attribute::RuntimeName, Attribute::Enabled],
            };
            let attrs = AttributeValues::read(&element, allowed)?;
            attrs.require(&[Attribute::Name, Attribute::RuntimeName])?;
            let name = attrs.required(Attribute::Name)?;
            let runtime_name = attrs.required(Attribute::RuntimeName)?;

            let mut op = add_child(owner, "deployment", name).with_parameter("runtime-name", runtime_name);
            match scope {
                DeploymentScope::Domain => {
                    self.names.deployments.declare(name, element.location)?;
                    let content = self.parse_deployment_content()?;
                    if content.is_empty() {
                        return Err(DomainXmlError::DeploymentHasNoContent {
                            deployment: name.to_string(),
                            location: element.location,
                        });
                    }
                    op.set_parameter("content", content);
                }
                DeploymentScope::ServerGroup => {
                    mapped.declare(name, element.location)?;
                    self.names.deployments.require(name, element.location)?;
                    op.set_parameter("enabled", attrs.boolean(Attribute::Enabled)?.unwrap_or(true));
                    self.reader.require_no_content()?;
                }
            }
            emit(ops, op);
        }
        Ok(())
    }

    /// Reads the content items of a domain deployment.
    fn parse_deployment_content(&mut self) -> Result<Vec<ModelValue>, DomainXmlError> {
        let mut items = Vec::new();
        while let Some(element) = self.next_domain_child()? {
            let item = match Element::from_local_name(element.name()) {
                Element::Content => {
                    let attrs = AttributeValues::read(&element, &[Attribute::Sha1])?;
                    let sha1 = attrs.required(Attribute::Sha1)?;
                    let hash = hex::decode(sha1)
                        .ok()
                        .filter(|bytes| bytes.len() == SHA1_LENGTH)
                        .ok_or_else(|| DomainXmlError::InvalidAttributeValue {
                            attribute: Attribute::Sha1.local_name(),
                            value: sha1.to_string(),
                            location: element.location,
                        })?;
                    BTreeMap::from([("hash".to_string(), ModelValue::Bytes(hash))])
                }
                kind @ (Element::FsArchive | Element::FsExploded) => {
                    let attrs = AttributeValues::read(&element, &[Attribute::Path, Attribute::RelativeTo])?;
                    let mut item = BTreeMap::new();
                    item.insert("path".to_string(), ModelValue::from(attrs.required(Attribute::Path)?));
                    if let Some(relative_to) = attrs.get(Attribute::RelativeTo) {
                        item.insert("relative-to".to_string(), ModelValue::from(relative_to));
                    }
                    item.insert("archive".to_string(), ModelValue::Boolean(kind == Element::FsArchive));
                    item
                }
                _ => return Err(unexpected_element(&element)),
            };
            self.reader.require_no_content()?;
            items.push(ModelValue::Object(item));
        }
        Ok(items)
    }
}
