// crates/topology-rs/src/lib.rs

#![doc = "Core resource model for multi-host domain topologies."]
#![doc = ""]
#![doc = "A topology is described as an ordered list of `Operation` records, each one"]
#![doc = "creating a resource at a `ResourceAddress`. Applying the list in order yields"]
#![doc = "a `Resource` tree keyed by address."]

// --- Foundation Modules ---
pub mod address;
pub mod error;
pub mod value;

// --- Model ---
pub mod operation;
pub mod resource;

// --- Top-level Exports ---
pub use address::{PathElement, ResourceAddress};
pub use error::TopologyError;
pub use operation::{Operation, OperationKind};
pub use resource::Resource;
pub use value::ModelValue;
