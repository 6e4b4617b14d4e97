// crates/topology-rs-xml/src/writer/mod.rs

//! Writes a resource tree back out as a domain document.
//!
//! Output always uses the current schema revision. Sections are written in
//! document order and omitted when the tree has nothing for them. Children are
//! written in the order they were added to the tree, so includes always refer
//! to entities written before them.

mod server_groups;

use crate::element::{Attribute, Criterion, Element};
use crate::error::DomainXmlError;
use crate::namespace::{SchemaVersion, XSI_NAMESPACE};
use crate::stream::XmlStreamWriter;
use crate::subsystem::SubsystemRegistry;
use log::{debug, info, warn};
use topology_rs::{ModelValue, Resource, ResourceAddress};

/// Indentation of written documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub char: u8,
    pub size: usize,
}

impl Default for Indent {
    fn default() -> Self {
        Self { char: b' ', size: 4 }
    }
}

/// Serializes the tree rooted at `root` as a complete domain document.
pub fn save_domain_to_string(
    root: &Resource,
    subsystems: &SubsystemRegistry,
    indent: Indent,
) -> Result<String, DomainXmlError> {
    let mut writer = XmlStreamWriter::new(indent.char, indent.size);

    writer.write_start_document()?;
    writer.write_start_element(Element::Domain.local_name())?;
    writer.write_default_namespace(SchemaVersion::CURRENT.uri())?;
    write_namespace_declarations(&mut writer, root)?;

    write_extensions(&mut writer, root)?;
    write_system_properties(&mut writer, root)?;
    write_paths(&mut writer, root)?;
    write_profiles(&mut writer, root, subsystems)?;
    write_interfaces(&mut writer, root)?;
    write_socket_binding_groups(&mut writer, root)?;
    write_deployments(&mut writer, root)?;
    server_groups::write_server_groups(&mut writer, root)?;

    writer.write_end_element()?;
    writer.write_end_document()?;
    let xml = writer.into_string()?;
    info!(
        "Wrote domain document ({}, {} bytes)",
        SchemaVersion::CURRENT,
        xml.len()
    );
    Ok(xml)
}

/// Returns a mandatory attribute of `resource` in its text form.
pub(crate) fn required_attribute(
    resource: &Resource,
    address: &ResourceAddress,
    name: &'static str,
) -> Result<String, DomainXmlError> {
    resource
        .attribute(name)
        .and_then(ModelValue::to_attribute_string)
        .ok_or_else(|| DomainXmlError::MissingModelAttribute {
            address: address.to_string(),
            attribute: name,
        })
}

/// Writes `parameter` as the XML attribute `attribute` when it is set.
pub(crate) fn write_optional(
    writer: &mut XmlStreamWriter,
    resource: &Resource,
    parameter: &str,
    attribute: Attribute,
) -> Result<(), DomainXmlError> {
    if let Some(text) = resource.attribute(parameter).and_then(ModelValue::to_attribute_string) {
        writer.write_attribute(attribute.local_name(), text.as_str())?;
    }
    Ok(())
}

/// Writes the root's prefixed namespace declarations and `xsi:schemaLocation`.
fn write_namespace_declarations(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    let namespaces = root.attribute("namespaces").and_then(ModelValue::as_object);
    for (prefix, uri) in namespaces.into_iter().flatten() {
        if let Some(uri) = uri.as_str() {
            writer.write_attribute(&format!("xmlns:{}", prefix), uri)?;
        }
    }

    let Some(locations) = root
        .attribute("schema-locations")
        .and_then(ModelValue::as_object)
        .filter(|locations| !locations.is_empty())
    else {
        return Ok(());
    };
    let xsi_prefix = namespaces
        .into_iter()
        .flatten()
        .find(|(_, uri)| uri.as_str() == Some(XSI_NAMESPACE))
        .map(|(prefix, _)| prefix.as_str());
    let prefix = match xsi_prefix {
        Some(prefix) => prefix,
        None => {
            writer.write_attribute("xmlns:xsi", XSI_NAMESPACE)?;
            "xsi"
        }
    };
    let value = locations
        .iter()
        .filter_map(|(namespace, location)| location.as_str().map(|l| format!("{} {}", namespace, l)))
        .collect::<Vec<_>>()
        .join(" ");
    writer.write_attribute(
        &format!("{}:{}", prefix, Attribute::SchemaLocation.local_name()),
        &value,
    )
}

fn write_extensions(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("extension") {
        return Ok(());
    }
    writer.write_start_element(Element::Extensions.local_name())?;
    for (module, _) in root.children("extension") {
        writer.write_empty_element(
            Element::Extension.local_name(),
            &[(Attribute::Module.local_name(), module)],
        )?;
    }
    writer.write_end_element()
}

pub(crate) fn write_system_properties(
    writer: &mut XmlStreamWriter,
    owner: &Resource,
) -> Result<(), DomainXmlError> {
    if !owner.has_children("system-property") {
        return Ok(());
    }
    writer.write_start_element(Element::SystemProperties.local_name())?;
    for (name, property) in owner.children("system-property") {
        writer.write_start_element(Element::Property.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        write_optional(writer, property, "value", Attribute::Value)?;
        write_optional(writer, property, "boot-time", Attribute::BootTime)?;
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_paths(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("path") {
        return Ok(());
    }
    writer.write_start_element(Element::Paths.local_name())?;
    for (name, path) in root.children("path") {
        writer.write_start_element(Element::Path.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        write_optional(writer, path, "path", Attribute::Path)?;
        write_optional(writer, path, "relative-to", Attribute::RelativeTo)?;
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

/// Writes each included name of `resource` as an `<include>` element.
fn write_includes(
    writer: &mut XmlStreamWriter,
    resource: &Resource,
    attribute: Attribute,
) -> Result<(), DomainXmlError> {
    let includes = resource
        .attribute("includes")
        .and_then(ModelValue::as_list)
        .unwrap_or_default();
    for included in includes.iter().filter_map(ModelValue::as_str) {
        writer.write_empty_element(Element::Include.local_name(), &[(attribute.local_name(), included)])?;
    }
    Ok(())
}

fn write_profiles(
    writer: &mut XmlStreamWriter,
    root: &Resource,
    subsystems: &SubsystemRegistry,
) -> Result<(), DomainXmlError> {
    if !root.has_children("profile") {
        return Ok(());
    }
    writer.write_start_element(Element::Profiles.local_name())?;
    for (name, profile) in root.children("profile") {
        writer.write_start_element(Element::Profile.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        write_includes(writer, profile, Attribute::Profile)?;
        for (subsystem_name, subsystem) in profile.children("subsystem") {
            match subsystems.writer(subsystem_name) {
                Some(delegate) => {
                    debug!("Writing subsystem '{}' of profile '{}'", subsystem_name, name);
                    delegate.write(writer, subsystem)?;
                }
                None => warn!(
                    "No writer registered for subsystem '{}' in profile '{}'; omitting it",
                    subsystem_name, name
                ),
            }
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_interfaces(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("interface") {
        return Ok(());
    }
    writer.write_start_element(Element::Interfaces.local_name())?;
    for (name, interface) in root.children("interface") {
        writer.write_start_element(Element::Interface.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        for (criterion, value) in &interface.attributes {
            let element = Element::from_local_name(criterion);
            match element.criterion() {
                Some(Criterion::Flag) => {
                    if value.as_bool() == Some(true) {
                        writer.write_empty_element(element.local_name(), &[])?;
                    }
                }
                Some(Criterion::Valued(attribute)) => {
                    if let Some(text) = value.to_attribute_string() {
                        writer.write_empty_element(element.local_name(), &[(attribute.local_name(), text.as_str())])?;
                    }
                }
                None => warn!("Interface '{}' has unknown criterion '{}'; omitting it", name, criterion),
            }
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_socket_binding_groups(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("socket-binding-group") {
        return Ok(());
    }
    writer.write_start_element(Element::SocketBindingGroups.local_name())?;
    for (name, group) in root.children("socket-binding-group") {
        let address = ResourceAddress::root().append("socket-binding-group", name);
        let default_interface = required_attribute(group, &address, "default-interface")?;
        writer.write_start_element(Element::SocketBindingGroup.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        writer.write_attribute(Attribute::DefaultInterface.local_name(), &default_interface)?;
        write_includes(writer, group, Attribute::SocketBindingGroup)?;

        for (binding_name, binding) in group.children("socket-binding") {
            writer.write_start_element(Element::SocketBinding.local_name())?;
            writer.write_attribute(Attribute::Name.local_name(), binding_name)?;
            write_optional(writer, binding, "interface", Attribute::Interface)?;
            write_optional(writer, binding, "port", Attribute::Port)?;
            write_optional(writer, binding, "fixed-port", Attribute::FixedPort)?;
            write_optional(writer, binding, "multicast-address", Attribute::MulticastAddress)?;
            write_optional(writer, binding, "multicast-port", Attribute::MulticastPort)?;
            writer.write_end_element()?;
        }
        for (binding_name, binding) in group.children("remote-destination-outbound-socket-binding") {
            let binding_address = address.append("remote-destination-outbound-socket-binding", binding_name);
            let host = required_attribute(binding, &binding_address, "host")?;
            let port = required_attribute(binding, &binding_address, "port")?;
            write_outbound_start(writer, binding_name, binding)?;
            writer.write_empty_element(
                Element::RemoteDestination.local_name(),
                &[(Attribute::Host.local_name(), host.as_str()), (Attribute::Port.local_name(), port.as_str())],
            )?;
            writer.write_end_element()?;
        }
        for (binding_name, binding) in group.children("local-destination-outbound-socket-binding") {
            let binding_address = address.append("local-destination-outbound-socket-binding", binding_name);
            let reference = required_attribute(binding, &binding_address, "socket-binding-ref")?;
            write_outbound_start(writer, binding_name, binding)?;
            writer.write_empty_element(
                Element::LocalDestination.local_name(),
                &[(Attribute::SocketBindingRef.local_name(), reference.as_str())],
            )?;
            writer.write_end_element()?;
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_outbound_start(writer: &mut XmlStreamWriter, name: &str, binding: &Resource) -> Result<(), DomainXmlError> {
    writer.write_start_element(Element::OutboundSocketBinding.local_name())?;
    writer.write_attribute(Attribute::Name.local_name(), name)?;
    write_optional(writer, binding, "source-interface", Attribute::SourceInterface)?;
    write_optional(writer, binding, "source-port", Attribute::SourcePort)?;
    write_optional(writer, binding, "fixed-source-port", Attribute::FixedSourcePort)
}

fn write_deployments(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("deployment") {
        return Ok(());
    }
    writer.write_start_element(Element::Deployments.local_name())?;
    for (name, deployment) in root.children("deployment") {
        let address = ResourceAddress::root().append("deployment", name);
        let runtime_name = required_attribute(deployment, &address, "runtime-name")?;
        let content = deployment
            .attribute("content")
            .and_then(ModelValue::as_list)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| DomainXmlError::MissingModelAttribute {
                address: address.to_string(),
                attribute: "content",
            })?;

        writer.write_start_element(Element::Deployment.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        writer.write_attribute(Attribute::RuntimeName.local_name(), &runtime_name)?;
        for item in content {
            write_content_item(writer, item, &address)?;
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_content_item(
    writer: &mut XmlStreamWriter,
    item: &ModelValue,
    address: &ResourceAddress,
) -> Result<(), DomainXmlError> {
    let missing = |attribute| DomainXmlError::MissingModelAttribute {
        address: address.to_string(),
        attribute,
    };
    let item = item.as_object().ok_or_else(|| missing("content"))?;
    if let Some(hash) = item.get("hash").and_then(ModelValue::as_bytes) {
        let sha1 = hex::encode(hash);
        return writer.write_empty_element(Element::Content.local_name(), &[(Attribute::Sha1.local_name(), sha1.as_str())]);
    }

    let path = item.get("path").and_then(ModelValue::as_str).ok_or_else(|| missing("path"))?;
    let element = match item.get("archive").and_then(ModelValue::as_bool) {
        Some(true) => Element::FsArchive,
        _ => Element::FsExploded,
    };
    writer.write_start_element(element.local_name())?;
    writer.write_attribute(Attribute::Path.local_name(), path)?;
    if let Some(relative_to) = item.get("relative-to").and_then(ModelValue::as_str) {
        writer.write_attribute(Attribute::RelativeTo.local_name(), relative_to)?;
    }
    writer.write_end_element()
}
