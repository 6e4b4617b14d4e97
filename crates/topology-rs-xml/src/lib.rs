// crates/topology-rs-xml/src/lib.rs

#![doc = "Reads and writes domain topology documents (`domain.xml`)."]
#![doc = ""]
#![doc = "A document is read into an ordered list of `topology_rs::Operation` records"]
#![doc = "and a `topology_rs::Resource` tree is written back as a document. Both"]
#![doc = "schema revisions 1.0 and 1.1 are read; writing always produces 1.1."]
#![doc = ""]
#![doc = "- `DomainXml::read_domain`: document to operations, validating names and references."]
#![doc = "- `to_resource_tree`: operations to a resource tree."]
#![doc = "- `DomainXml::write_domain`: resource tree to document."]
#![doc = ""]
#![doc = "Subsystem configuration is read and written by delegates registered in a"]
#![doc = "`SubsystemRegistry`."]

// --- Crate Modules ---

mod builder;
mod converter;
mod domain;
mod element;
mod error;
mod namespace;
mod parser;
mod resolver;
mod writer;

pub mod stream;
pub mod subsystem;

// --- Public API Re-exports ---

pub use converter::to_resource_tree;
pub use domain::DomainXml;
pub use error::{DomainXmlError, ErrorCategory};
pub use namespace::SchemaVersion;
pub use parser::load_domain_from_str;
pub use stream::{Location, StartElement, XmlStreamReader, XmlStreamWriter};
pub use subsystem::{SimpleSubsystem, SubsystemParser, SubsystemRegistry, SubsystemWriter};
pub use writer::{save_domain_to_string, Indent};
