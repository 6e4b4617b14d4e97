// crates/topology-rs-xml/src/converter.rs

//! Materializes an operation list into the core crate's `Resource` tree.

use crate::error::DomainXmlError;
use log::debug;
use topology_rs::{Operation, Resource};

/// Applies `operations` in order to an empty tree.
///
/// This is the inverse bridge of a read: the returned tree is what
/// `DomainXml::write_domain` expects.
pub fn to_resource_tree(operations: &[Operation]) -> Result<Resource, DomainXmlError> {
    let tree = Resource::from_operations(operations)?;
    debug!("Materialized {} operations into a resource tree", operations.len());
    Ok(tree)
}
