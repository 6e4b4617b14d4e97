// crates/topology-rs-xml/src/subsystem.rs

//! Delegated parsing and writing of subsystem configuration.
//!
//! Each subsystem owns the grammar of its `<subsystem>` element. The document
//! reader only locates the element, looks up the parser registered for its
//! namespace, and re-parents the returned operations under the owning profile.
//! The document writer looks up a writer by subsystem name.

use crate::error::DomainXmlError;
use crate::stream::{StartElement, XmlStreamReader, XmlStreamWriter};
use std::collections::BTreeMap;
use std::sync::Arc;
use topology_rs::{Operation, Resource, ResourceAddress};

/// Parses one `<subsystem>` element.
pub trait SubsystemParser: Send + Sync {
    /// Called with the reader positioned just after `element`'s start tag.
    ///
    /// Implementations must consume the element up to and including its end
    /// tag and return operations addressed relative to the owning profile,
    /// e.g. `[subsystem=web]`, `[subsystem=web, connector=http]`.
    fn parse(
        &self,
        reader: &mut XmlStreamReader<'_>,
        element: &StartElement,
    ) -> Result<Vec<Operation>, DomainXmlError>;
}

/// Writes one subsystem resource as a `<subsystem>` element.
pub trait SubsystemWriter: Send + Sync {
    fn write(&self, writer: &mut XmlStreamWriter, subsystem: &Resource) -> Result<(), DomainXmlError>;
}

/// Subsystem parsers keyed by namespace URI and writers keyed by subsystem name.
///
/// Built once and handed to `DomainXml`; never modified during a read or write.
#[derive(Clone, Default)]
pub struct SubsystemRegistry {
    parsers: BTreeMap<String, Arc<dyn SubsystemParser>>,
    writers: BTreeMap<String, Arc<dyn SubsystemWriter>>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_parser(&mut self, namespace: impl Into<String>, parser: Arc<dyn SubsystemParser>) {
        self.parsers.insert(namespace.into(), parser);
    }

    pub fn register_writer(&mut self, name: impl Into<String>, writer: Arc<dyn SubsystemWriter>) {
        self.writers.insert(name.into(), writer);
    }

    /// Registers a delegate that both parses and writes a subsystem.
    pub fn register<D>(&mut self, name: impl Into<String>, namespace: impl Into<String>, delegate: Arc<D>)
    where
        D: SubsystemParser + SubsystemWriter + 'static,
    {
        self.parsers.insert(namespace.into(), delegate.clone());
        self.writers.insert(name.into(), delegate);
    }

    pub fn parser(&self, namespace: &str) -> Option<&Arc<dyn SubsystemParser>> {
        self.parsers.get(namespace)
    }

    pub fn writer(&self, name: &str) -> Option<&Arc<dyn SubsystemWriter>> {
        self.writers.get(name)
    }
}

impl core::fmt::Debug for SubsystemRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubsystemRegistry")
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .field("writers", &self.writers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A subsystem whose whole configuration is the attributes of its
/// `<subsystem>` element.
///
/// Every unprefixed attribute becomes a string parameter of the subsystem's
/// `add` operation. Child elements are rejected.
#[derive(Debug, Clone)]
pub struct SimpleSubsystem {
    name: String,
    namespace: String,
}

impl SimpleSubsystem {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Registers this subsystem as both parser and writer.
    pub fn register_into(self, registry: &mut SubsystemRegistry) {
        let name = self.name.clone();
        let namespace = self.namespace.clone();
        registry.register(name, namespace, Arc::new(self));
    }
}

impl SubsystemParser for SimpleSubsystem {
    fn parse(
        &self,
        reader: &mut XmlStreamReader<'_>,
        element: &StartElement,
    ) -> Result<Vec<Operation>, DomainXmlError> {
        let mut op = Operation::add(ResourceAddress::root().append("subsystem", self.name.as_str()));
        for attr in &element.attributes {
            if attr.namespace.is_some() || op.parameters.contains_key(&attr.local_name) {
                return Err(DomainXmlError::UnexpectedAttribute {
                    name: attr.local_name.clone(),
                    location: element.location,
                });
            }
            op.set_parameter(attr.local_name.clone(), attr.value.clone());
        }
        reader.require_no_content()?;
        Ok(vec![op])
    }
}

impl SubsystemWriter for SimpleSubsystem {
    fn write(&self, writer: &mut XmlStreamWriter, subsystem: &Resource) -> Result<(), DomainXmlError> {
        writer.write_start_element("subsystem")?;
        writer.write_default_namespace(&self.namespace)?;
        for (name, value) in &subsystem.attributes {
            if let Some(text) = value.to_attribute_string() {
                writer.write_attribute(name, &text)?;
            }
        }
        writer.write_end_element()
    }
}

/// Extracts the subsystem name from a relative operation address, if the
/// first segment is `subsystem=<name>`.
pub(crate) fn subsystem_name(address: &ResourceAddress) -> Option<&str> {
    address
        .iter()
        .next()
        .filter(|e| e.key == "subsystem")
        .map(|e| e.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Tag;
    use topology_rs::ModelValue;

    #[test]
    fn test_simple_subsystem_parses_attributes() {
        let xml = r#"<subsystem xmlns="urn:test:web:1.0" default-host="localhost"/>"#;
        let mut reader = XmlStreamReader::new(xml);
        let Tag::Start(element) = reader.next_tag().unwrap() else {
            panic!("expected start tag");
        };

        let web = SimpleSubsystem::new("web", "urn:test:web:1.0");
        let ops = web.parse(&mut reader, &element).unwrap();

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].address.to_string(), "/subsystem=web");
        assert_eq!(
            ops[0].parameter("default-host").and_then(ModelValue::as_str),
            Some("localhost")
        );
        assert_eq!(subsystem_name(&ops[0].address), Some("web"));
    }

    #[test]
    fn test_simple_subsystem_rejects_children() {
        let xml = r#"<subsystem xmlns="urn:test:web:1.0"><connector/></subsystem>"#;
        let mut reader = XmlStreamReader::new(xml);
        let Tag::Start(element) = reader.next_tag().unwrap() else {
            panic!("expected start tag");
        };
        let web = SimpleSubsystem::new("web", "urn:test:web:1.0");
        assert!(matches!(
            web.parse(&mut reader, &element),
            Err(DomainXmlError::UnexpectedElement { ref name, .. }) if name == "connector"
        ));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = SubsystemRegistry::new();
        SimpleSubsystem::new("web", "urn:test:web:1.0").register_into(&mut registry);

        assert!(registry.parser("urn:test:web:1.0").is_some());
        assert!(registry.writer("web").is_some());
        assert!(registry.parser("web").is_none());
        assert!(registry.writer("urn:test:web:1.0").is_none());
    }

    #[test]
    fn test_simple_subsystem_writes_namespace_and_attributes() {
        let mut resource = Resource::new();
        resource
            .attributes
            .insert("default-host".to_string(), ModelValue::from("localhost"));

        let mut writer = XmlStreamWriter::new(b' ', 4);
        SimpleSubsystem::new("web", "urn:test:web:1.0")
            .write(&mut writer, &resource)
            .unwrap();
        let xml = writer.into_string().unwrap();
        assert_eq!(
            xml,
            r#"<subsystem xmlns="urn:test:web:1.0" default-host="localhost"/>"#
        );
    }
}
