use crate::{
    device::{DeviceKind, NetDevice, NodeHandle},
    types::{
        Command, CommandOutcome, E2Message, E2NodeId, NodeIdentity, NodeType, RegistrationRequest,
        Report,
    },
    E2Error,
};
use log::{debug, info};

/// Trait for E2 node terminators, the managed-node end of the E2 interface.
///
/// Implementors supply the variant-specific pieces (node type, identity and
/// command handling); the lifecycle shared by all variants is provided on top
/// of [`TerminatorCore`].
pub trait E2NodeTerminator: Send {
    /// The node type reported to the Near-RT RIC. Constant per variant.
    fn node_type(&self) -> NodeType;

    /// Receives and processes a command.
    fn receive_command(&mut self, command: &Command) -> Result<CommandOutcome, E2Error>;

    /// Simulator-level identity of the managed node.
    fn identity(&self) -> Result<NodeIdentity, E2Error>;

    fn core(&self) -> &TerminatorCore;

    fn core_mut(&mut self) -> &mut TerminatorCore;

    /// Attaches the terminator to a node and selects the device slot to manage.
    fn attach(&mut self, node: NodeHandle, net_device_index: u32) {
        let core = self.core_mut();
        debug!("{}: attached to node {} device {}", core.name, node.id(), net_device_index);
        core.node = Some(node);
        core.net_device_index = net_device_index;
    }

    /// Activates the terminator and returns the registration request to send.
    ///
    /// An already active terminator returns no messages. If the identity cannot
    /// be resolved the terminator stays inactive.
    fn activate(&mut self) -> Result<Vec<E2Message>, E2Error> {
        if self.core().active {
            return Ok(Vec::new());
        }
        self.identity()?;
        let node_type = self.node_type();
        let core = self.core_mut();
        core.active = true;
        core.reports.clear();
        info!("{}: activated as {} node", core.name, node_type);
        self.register()
    }

    /// Builds a registration request carrying the current E2 node ID.
    ///
    /// Sent again while active so that a RIC that missed the first request
    /// still learns about the node. Inactive terminators send nothing.
    fn register(&self) -> Result<Vec<E2Message>, E2Error> {
        if !self.core().active {
            return Ok(Vec::new());
        }
        Ok(vec![E2Message::RegistrationRequest(RegistrationRequest {
            node_type: self.node_type(),
            e2_node_id: self.core().e2_node_id,
            identity: self.identity()?,
        })])
    }

    /// Deactivates the terminator and returns the deregistration request to send.
    fn deactivate(&mut self) -> Vec<E2Message> {
        let core = self.core_mut();
        if !core.active {
            return Vec::new();
        }
        core.active = false;
        info!("{}: deactivated", core.name);
        vec![E2Message::DeregistrationRequest(core.e2_node_id)]
    }

    fn is_active(&self) -> bool {
        self.core().active
    }

    fn e2_node_id(&self) -> E2NodeId {
        self.core().e2_node_id
    }

    fn name(&self) -> &str {
        &self.core().name
    }

    fn node(&self) -> Option<&NodeHandle> {
        self.core().node.as_ref()
    }

    fn net_device_index(&self) -> u32 {
        self.core().net_device_index
    }

    /// Buffers a report for the next send. Reports are dropped while inactive.
    fn store_report(&mut self, report: Report) {
        let core = self.core_mut();
        if core.active {
            core.reports.push(report);
        }
    }

    /// Drains buffered reports into messages for the RIC.
    fn send_reports(&mut self) -> Vec<E2Message> {
        let core = self.core_mut();
        if !core.active {
            return Vec::new();
        }
        core.reports.drain(..).map(E2Message::Report).collect()
    }

    fn receive_registration_response(&mut self, e2_node_id: E2NodeId) {
        let core = self.core_mut();
        if core.active && core.e2_node_id != e2_node_id {
            debug!("{}: registered with E2 node ID {}", core.name, e2_node_id);
            core.e2_node_id = e2_node_id;
        }
    }

    fn receive_deregistration_response(&mut self, e2_node_id: E2NodeId) {
        let core = self.core_mut();
        debug!("{}: deregistered E2 node ID {}", core.name, e2_node_id);
        core.e2_node_id = 0;
    }
}

/// State shared by every terminator variant.
#[derive(Debug, Clone)]
pub struct TerminatorCore {
    /// Whether the terminator is active. Commands are ignored while false.
    active: bool,

    /// E2 node ID assigned by the RIC, 0 until registered.
    e2_node_id: E2NodeId,

    name: String,

    /// Node that this terminator is attached to.
    node: Option<NodeHandle>,

    /// Index of the managed device on the node.
    net_device_index: u32,

    /// Reports waiting to be sent.
    reports: Vec<Report>,
}

impl TerminatorCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            active: false,
            e2_node_id: 0,
            name: name.into(),
            node: None,
            net_device_index: 0,
            reports: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> Option<&NodeHandle> {
        self.node.as_ref()
    }

    pub fn net_device_index(&self) -> u32 {
        self.net_device_index
    }

    /// Number of reports waiting to be sent.
    pub fn pending_reports(&self) -> usize {
        self.reports.len()
    }

    /// Resolves the configured device slot and applies a capability check.
    ///
    /// The node is queried on every call; nothing is cached.
    pub fn resolve_device<T>(
        &self,
        expected: DeviceKind,
        cast: impl FnOnce(&NetDevice) -> Option<T>,
    ) -> Result<T, E2Error> {
        let node = self.node.as_ref().ok_or(E2Error::NotAttached)?;
        let index = self.net_device_index;
        let device = node.device(index).ok_or(E2Error::DeviceNotFound {
            node: node.id(),
            index,
        })?;
        cast(&device).ok_or(E2Error::CapabilityMismatch {
            node: node.id(),
            index,
            expected,
            found: device.kind(),
        })
    }
}
