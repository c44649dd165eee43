//! e2node: the managed-node side of the O-RAN E2 interface for simulated LTE and wired nodes.
//!
//! Each managed node gets an E2 node terminator. A terminator reports its node type to the
//! Near-RT RIC, registers and deregisters with it, buffers reports, and receives the commands
//! the RIC addresses to its node. The LTE terminators resolve their concrete device from the
//! owning simulation node through a capability-checked query on every access.
//!
//! # Features
//! - LTE UE, LTE eNB and wired terminator variants behind one trait.
//! - Closed command set, dispatched by exhaustive matching.
//! - In-memory Near-RT RIC E2 terminator that assigns E2 node IDs and routes commands.
//! - TOML topology configuration with a node type to constructor lookup.
//!
//! # Example
//! ```
//! use e2node::{E2NodeTerminator, LteUeNetDevice, LteUeTerminator, NetDevice, Node, NodeType};
//!
//! let node = Node::with_devices(1, vec![NetDevice::lte_ue(LteUeNetDevice::new(1001, 1, 1))]);
//! let mut ue = LteUeTerminator::default();
//! ue.attach(node, 0);
//!
//! assert_eq!(ue.node_type(), NodeType::LteUe);
//! let device = ue.net_device().unwrap();
//! assert_eq!(device.lock().unwrap().imsi, 1001);
//! ```

mod config;
mod container;
mod device;
mod error;
mod lte_enb;
mod lte_ue;
mod ric;
mod terminator;
mod types;
mod wired;

pub use config::{terminator_factory, TerminatorConfig, TerminatorFactory, TopologyConfig};
pub use container::TerminatorContainer;
pub use device::{
    DeviceKind, HandoverRequest, LteEnbDevice, LteEnbNetDevice, LteEnbRrc, LteUeDevice,
    LteUeNetDevice, NetDevice, Node, NodeHandle, WiredDevice, WiredNetDevice,
};
pub use error::E2Error;
pub use lte_enb::LteEnbTerminator;
pub use lte_ue::LteUeTerminator;
pub use ric::{DataRepository, NearRtRic, NodeRecord};
pub use terminator::{E2NodeTerminator, TerminatorCore};
pub use types::{
    Command, CommandOutcome, E2Message, E2NodeId, Lte2LteHandover, NodeIdentity, NodeType,
    RegistrationRequest, Report, ReportPayload, RsrpRsrq,
};
pub use wired::WiredTerminator;
