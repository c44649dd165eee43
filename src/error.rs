use thiserror::Error;

use crate::device::DeviceKind;
use crate::types::E2NodeId;

/// Errors that can occur in the e2node library.
#[derive(Error, Debug)]
pub enum E2Error {
    /// The terminator has not been attached to a simulation node.
    #[error("terminator is not attached to a node")]
    NotAttached,

    /// The configured device slot is empty.
    #[error("node {node} has no network device at index {index}")]
    DeviceNotFound { node: u32, index: u32 },

    /// The device in the configured slot lacks the required capability.
    #[error("network device {index} on node {node} is a {found} device, expected {expected}")]
    CapabilityMismatch {
        node: u32,
        index: u32,
        expected: DeviceKind,
        found: DeviceKind,
    },

    /// No terminator is registered under this E2 node ID.
    #[error("no E2 node registered with ID {0}")]
    UnknownE2Node(E2NodeId),

    /// A configuration entry references a node that does not exist.
    #[error("unknown simulation node {0}")]
    UnknownNode(u32),

    /// A RIC terminator slot is out of range.
    #[error("invalid terminator slot {0}")]
    InvalidSlot(usize),

    /// The topology configuration could not be parsed.
    #[error("invalid topology configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The topology configuration could not be read.
    #[error("failed to read topology configuration: {0}")]
    Io(#[from] std::io::Error),
}
