// crates/topology-rs-xml/src/builder.rs

//! Helpers for building the `add` operations a document read emits.

use log::trace;
use topology_rs::{ModelValue, Operation, ResourceAddress};

/// Builds the `add` operation for `key=name` under `parent`.
pub(crate) fn add_child(parent: &ResourceAddress, key: &str, name: &str) -> Operation {
    Operation::add(parent.append(key, name))
}

/// Appends `op` to `ops`.
pub(crate) fn emit(ops: &mut Vec<Operation>, op: Operation) {
    trace!("Emitting {}", op);
    ops.push(op);
}

/// Rewrites operations addressed relative to `owner` so they are addressed
/// from the root, keeping their order and parameters.
pub(crate) fn reparent(operations: Vec<Operation>, owner: &ResourceAddress) -> Vec<Operation> {
    operations
        .into_iter()
        .map(|mut op| {
            op.address = op.address.prefixed_with(owner);
            op
        })
        .collect()
}

/// Sets `name` to `value` on `op` when `value` is present.
pub(crate) fn set_optional<V: Into<ModelValue>>(op: &mut Operation, name: &str, value: Option<V>) {
    if let Some(value) = value {
        op.set_parameter(name, value);
    }
}
