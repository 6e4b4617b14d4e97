// crates/topology-rs/src/resource.rs

//! The normalized resource tree.
//!
//! Each `Resource` holds its own attributes plus its children grouped by child
//! type. Child types and child names keep the order in which they were added,
//! so walking a tree built from an operation list visits siblings in
//! declaration order.

use crate::address::ResourceAddress;
use crate::error::TopologyError;
use crate::operation::{Operation, OperationKind};
use crate::value::ModelValue;
use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub attributes: BTreeMap<String, ModelValue>,
    pub children: IndexMap<String, IndexMap<String, Resource>>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by applying `add` operations in order, starting from an
    /// empty root.
    ///
    /// Every operation's parent must already exist; the root is implicit.
    pub fn from_operations(operations: &[Operation]) -> Result<Self, TopologyError> {
        let mut root = Resource::new();
        for op in operations {
            root.apply(op)?;
        }
        Ok(root)
    }

    /// Applies a single operation to this tree, treating `self` as the root.
    pub fn apply(&mut self, op: &Operation) -> Result<(), TopologyError> {
        match op.kind {
            OperationKind::Add => {
                let Some(last) = op.address.last() else {
                    // An add on the root merges attributes into it.
                    self.attributes
                        .extend(op.parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
                    return Ok(());
                };
                let parent_address = op.address.parent().unwrap_or_default();
                let parent =
                    self.navigate_mut(&parent_address)
                        .ok_or_else(|| TopologyError::ParentNotFound {
                            address: op.address.to_string(),
                        })?;
                let siblings = parent.children.entry(last.key.clone()).or_default();
                if siblings.contains_key(&last.value) {
                    return Err(TopologyError::DuplicateResource {
                        address: op.address.to_string(),
                    });
                }
                trace!("Applying {}", op);
                siblings.insert(
                    last.value.clone(),
                    Resource {
                        attributes: op.parameters.clone(),
                        children: IndexMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&ModelValue> {
        self.attributes.get(name)
    }

    pub fn child(&self, key: &str, name: &str) -> Option<&Resource> {
        self.children.get(key).and_then(|c| c.get(name))
    }

    /// Iterates the children of one type in insertion order.
    pub fn children(&self, key: &str) -> impl Iterator<Item = (&str, &Resource)> {
        self.children
            .get(key)
            .into_iter()
            .flat_map(|c| c.iter().map(|(name, r)| (name.as_str(), r)))
    }

    pub fn has_children(&self, key: &str) -> bool {
        self.children.get(key).is_some_and(|c| !c.is_empty())
    }

    /// Finds the resource at `address`, relative to `self`.
    pub fn navigate(&self, address: &ResourceAddress) -> Option<&Resource> {
        address
            .iter()
            .try_fold(self, |current, element| current.child(&element.key, &element.value))
    }

    fn navigate_mut(&mut self, address: &ResourceAddress) -> Option<&mut Resource> {
        let mut current = self;
        for element in address.iter() {
            current = current
                .children
                .get_mut(&element.key)?
                .get_mut(&element.value)?;
        }
        Some(current)
    }
}
