// crates/topology-rs-xml/src/writer/server_groups.rs

use super::{required_attribute, write_optional, write_system_properties};
use crate::element::{Attribute, Element};
use crate::error::DomainXmlError;
use crate::stream::XmlStreamWriter;
use log::warn;
use topology_rs::{ModelValue, Resource, ResourceAddress};

pub(super) fn write_server_groups(writer: &mut XmlStreamWriter, root: &Resource) -> Result<(), DomainXmlError> {
    if !root.has_children("server-group") {
        return Ok(());
    }
    writer.write_start_element(Element::ServerGroups.local_name())?;
    for (name, group) in root.children("server-group") {
        let address = ResourceAddress::root().append("server-group", name);
        let profile = required_attribute(group, &address, "profile")?;
        writer.write_start_element(Element::ServerGroup.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        writer.write_attribute(Attribute::Profile.local_name(), &profile)?;
        write_optional(
            writer,
            group,
            "management-subsystem-endpoint",
            Attribute::ManagementSubsystemEndpoint,
        )?;

        let mut jvms = group.children("jvm");
        if let Some((jvm_name, jvm)) = jvms.next() {
            write_jvm(writer, jvm_name, jvm)?;
        }
        if jvms.next().is_some() {
            warn!("Server group '{}' has more than one jvm; only the first is written", name);
        }

        if group.attribute("socket-binding-group").is_some() {
            let reference = required_attribute(group, &address, "socket-binding-group")?;
            writer.write_start_element(Element::SocketBindingGroup.local_name())?;
            writer.write_attribute(Attribute::Ref.local_name(), &reference)?;
            write_optional(writer, group, "socket-binding-port-offset", Attribute::PortOffset)?;
            writer.write_end_element()?;
        } else if group.attribute("socket-binding-port-offset").is_some() {
            return Err(DomainXmlError::MissingModelAttribute {
                address: address.to_string(),
                attribute: "socket-binding-group",
            });
        }

        write_deployments(writer, group, &address)?;
        write_system_properties(writer, group)?;
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

/// Writes the deployments mapped onto a server group. `enabled` is only
/// written when it is false.
fn write_deployments(
    writer: &mut XmlStreamWriter,
    group: &Resource,
    group_address: &ResourceAddress,
) -> Result<(), DomainXmlError> {
    if !group.has_children("deployment") {
        return Ok(());
    }
    writer.write_start_element(Element::Deployments.local_name())?;
    for (name, deployment) in group.children("deployment") {
        let address = group_address.append("deployment", name);
        let runtime_name = required_attribute(deployment, &address, "runtime-name")?;
        writer.write_start_element(Element::Deployment.local_name())?;
        writer.write_attribute(Attribute::Name.local_name(), name)?;
        writer.write_attribute(Attribute::RuntimeName.local_name(), &runtime_name)?;
        if deployment.attribute("enabled").and_then(ModelValue::as_bool) == Some(false) {
            writer.write_attribute(Attribute::Enabled.local_name(), "false")?;
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_jvm(writer: &mut XmlStreamWriter, name: &str, jvm: &Resource) -> Result<(), DomainXmlError> {
    writer.write_start_element(Element::Jvm.local_name())?;
    writer.write_attribute(Attribute::Name.local_name(), name)?;
    write_optional(writer, jvm, "java-home", Attribute::JavaHome)?;
    write_optional(writer, jvm, "type", Attribute::Type)?;
    write_optional(writer, jvm, "debug-enabled", Attribute::DebugEnabled)?;
    write_optional(writer, jvm, "debug-options", Attribute::DebugOptions)?;

    write_sizes(writer, jvm, Element::Heap, "heap-size", "max-heap-size")?;
    write_sizes(writer, jvm, Element::Permgen, "permgen-size", "max-permgen-size")?;
    if jvm.attribute("stack-size").is_some() {
        writer.write_start_element(Element::Stack.local_name())?;
        write_optional(writer, jvm, "stack-size", Attribute::Size)?;
        writer.write_end_element()?;
    }

    if let Some(options) = jvm.attribute("jvm-options").and_then(ModelValue::as_list) {
        writer.write_start_element(Element::JvmOptions.local_name())?;
        for option in options.iter().filter_map(ModelValue::as_str) {
            writer.write_empty_element(Element::Option.local_name(), &[(Attribute::Value.local_name(), option)])?;
        }
        writer.write_end_element()?;
    }

    if let Some(variables) = jvm.attribute("environment-variables").and_then(ModelValue::as_object) {
        writer.write_start_element(Element::EnvironmentVariables.local_name())?;
        for (variable, value) in variables {
            let Some(value) = value.as_str() else {
                continue;
            };
            writer.write_empty_element(
                Element::Variable.local_name(),
                &[(Attribute::Name.local_name(), variable.as_str()), (Attribute::Value.local_name(), value)],
            )?;
        }
        writer.write_end_element()?;
    }
    writer.write_end_element()
}

fn write_sizes(
    writer: &mut XmlStreamWriter,
    jvm: &Resource,
    element: Element,
    size: &str,
    max_size: &str,
) -> Result<(), DomainXmlError> {
    if jvm.attribute(size).is_none() && jvm.attribute(max_size).is_none() {
        return Ok(());
    }
    writer.write_start_element(element.local_name())?;
    write_optional(writer, jvm, size, Attribute::Size)?;
    write_optional(writer, jvm, max_size, Attribute::MaxSize)?;
    writer.write_end_element()
}
