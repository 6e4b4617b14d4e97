// crates/topology-rs/src/error.rs

use core::fmt;

/// Errors raised while building or navigating the resource model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// An operation targets an address whose parent resource does not exist.
    ParentNotFound { address: String },
    /// An operation would create a resource that already exists.
    DuplicateResource { address: String },
    /// An address string could not be parsed.
    InvalidAddress(String),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentNotFound { address } => {
                write!(f, "Parent resource of {} does not exist", address)
            }
            Self::DuplicateResource { address } => {
                write!(f, "Resource {} already exists", address)
            }
            Self::InvalidAddress(s) => write!(f, "Invalid resource address: {}", s),
        }
    }
}

impl std::error::Error for TopologyError {}
