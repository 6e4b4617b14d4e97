// crates/topology-rs-xml/src/domain.rs

use crate::error::DomainXmlError;
use crate::parser::load_domain_from_str;
use crate::subsystem::SubsystemRegistry;
use crate::writer::{save_domain_to_string, Indent};
use std::sync::Arc;
use topology_rs::{Operation, Resource};

/// Reader and writer for domain documents.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// reads and writes from several threads.
#[derive(Debug, Clone)]
pub struct DomainXml {
    subsystems: Arc<SubsystemRegistry>,
    indent: Indent,
}

impl DomainXml {
    pub fn new(subsystems: SubsystemRegistry) -> Self {
        Self {
            subsystems: Arc::new(subsystems),
            indent: Indent::default(),
        }
    }

    /// Sets the indentation used by `write_domain`.
    pub fn with_indent(mut self, indent_char: u8, indent_size: usize) -> Self {
        self.indent = Indent {
            char: indent_char,
            size: indent_size,
        };
        self
    }

    pub fn subsystems(&self) -> &SubsystemRegistry {
        &self.subsystems
    }

    /// Reads a document in any supported schema revision.
    pub fn read_domain(&self, input: &str) -> Result<Vec<Operation>, DomainXmlError> {
        load_domain_from_str(input, &self.subsystems)
    }

    /// Writes `root` as a document in the current schema revision.
    pub fn write_domain(&self, root: &Resource) -> Result<String, DomainXmlError> {
        save_domain_to_string(root, &self.subsystems, self.indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_domain_xml_is_shareable() {
        assert_send_sync::<DomainXml>();
    }

    #[test]
    fn test_indent_is_configurable() {
        let domain = DomainXml::new(SubsystemRegistry::new()).with_indent(b'\t', 1);
        let mut root = Resource::new();
        root.apply(&Operation::add("/extension=org.example.web".parse().unwrap()))
            .unwrap();
        let xml = domain.write_domain(&root).unwrap();
        assert!(xml.contains("\n\t<extensions>"), "{}", xml);
        assert!(xml.contains("\n\t\t<extension module=\"org.example.web\"/>"), "{}", xml);
    }
}
