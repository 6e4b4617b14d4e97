// crates/topology-rs/src/operation.rs

use crate::address::ResourceAddress;
use crate::value::ModelValue;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of change an operation applies to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Creates the resource at the operation's address.
    Add,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Add => write!(f, "add"),
        }
    }
}

/// A single "create resource at address with these parameters" instruction.
///
/// The output of reading a document is an ordered list of these; a parent's
/// operation always precedes the operations of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub address: ResourceAddress,
    pub kind: OperationKind,
    pub parameters: BTreeMap<String, ModelValue>,
}

impl Operation {
    /// Creates an `add` operation without parameters.
    pub fn add(address: ResourceAddress) -> Self {
        Self {
            address,
            kind: OperationKind::Add,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<ModelValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ModelValue>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn parameter(&self, name: &str) -> Option<&ModelValue> {
        self.parameters.get(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.kind)?;
        if !self.parameters.is_empty() {
            let names: Vec<&str> = self.parameters.keys().map(String::as_str).collect();
            write!(f, "({})", names.join(","))?;
        }
        Ok(())
    }
}
