use serde::{Deserialize, Serialize};
use std::fmt;

/// E2 node identifier assigned by the Near-RT RIC. Zero means "not registered".
pub type E2NodeId = u64;

/// Role of a managed node, as reported to the Near-RT RIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Wired node, identified by its simulation node ID.
    Wired,

    /// LTE user equipment, identified by IMSI.
    LteUe,

    /// LTE eNB, identified by cell ID.
    LteEnb,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Wired => write!(f, "Wired"),
            NodeType::LteUe => write!(f, "LteUe"),
            NodeType::LteEnb => write!(f, "LteEnb"),
        }
    }
}

/// Simulator-level identity recorded by the RIC when a node registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeIdentity {
    /// Wired node, by simulation node ID.
    Wired { node_id: u32 },

    /// LTE UE, by IMSI.
    LteUe { imsi: u64 },

    /// LTE eNB, by cell ID.
    LteEnb { cell_id: u16 },
}

/// Commands issued by the Near-RT RIC to a managed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Hand an LTE UE over to another LTE cell.
    Lte2LteHandover(Lte2LteHandover),
}

impl Command {
    /// E2 node ID of the recipient.
    pub fn target_e2_node_id(&self) -> E2NodeId {
        match self {
            Command::Lte2LteHandover(cmd) => cmd.target_e2_node_id,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Lte2LteHandover(cmd) => write!(
                f,
                "Lte2LteHandover(TargetE2NodeId = {}; TargetCellId = {}; TargetRnti = {})",
                cmd.target_e2_node_id, cmd.target_cell_id, cmd.target_rnti
            ),
        }
    }
}

/// Payload of [`Command::Lte2LteHandover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lte2LteHandover {
    /// E2 node ID of the serving eNB that should perform the handover.
    pub target_e2_node_id: E2NodeId,

    /// ID of the LTE cell to hand over to.
    pub target_cell_id: u16,

    /// Current RNTI of the UE to hand over.
    pub target_rnti: u16,
}

/// What a terminator did with a received command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The terminator is inactive; the command was dropped.
    Ignored,

    /// The command was applied to the device.
    Executed,

    /// The terminator is active but has no action for this command.
    Unsupported,
}

/// A report produced on a managed node and delivered to the RIC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// E2 node ID of the reporting node.
    pub reporter: E2NodeId,

    /// Simulation time at which the report was generated, in seconds.
    pub time: f64,

    /// Report contents.
    pub payload: ReportPayload,
}

/// Contents of a [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportPayload {
    /// Serving cell of an LTE UE.
    LteUeCellInfo { cell_id: u16, rnti: u16 },

    /// Node position.
    Location { x: f64, y: f64, z: f64 },

    /// Application packet loss ratio observed on the node.
    AppLoss { loss: f64 },

    /// Signal quality of one cell as measured by an LTE UE.
    LteUeRsrpRsrq(RsrpRsrq),
}

/// One RSRP/RSRQ measurement reported by an LTE UE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsrpRsrq {
    /// RNTI assigned to the UE by the measured cell.
    pub rnti: u16,

    /// ID of the measured cell.
    pub cell_id: u16,

    /// Reference signal received power, in dBm.
    pub rsrp: f64,

    /// Reference signal received quality, in dB.
    pub rsrq: f64,

    /// Whether the measured cell is the serving cell.
    pub is_serving_cell: bool,

    /// Component carrier on which the cell was measured.
    pub component_carrier_id: u8,
}

/// Messages a terminator hands to the Near-RT RIC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum E2Message {
    /// Register (or refresh the registration of) a node.
    RegistrationRequest(RegistrationRequest),

    /// Deregister a node.
    DeregistrationRequest(E2NodeId),

    /// Deliver a buffered report.
    Report(Report),
}

/// Payload of [`E2Message::RegistrationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Node type of the registering terminator.
    pub node_type: NodeType,

    /// Current E2 node ID of the terminator, 0 on first registration.
    pub e2_node_id: E2NodeId,

    /// Simulator-level identity of the managed node.
    pub identity: NodeIdentity,
}
