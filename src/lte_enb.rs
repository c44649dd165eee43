use crate::{
    device::{lock, DeviceKind, LteEnbDevice},
    terminator::{E2NodeTerminator, TerminatorCore},
    types::{Command, CommandOutcome, NodeIdentity, NodeType},
    E2Error,
};
use log::{debug, info};

/// E2 node terminator for an LTE eNB. Executes LTE-to-LTE handovers.
#[derive(Debug, Clone)]
pub struct LteEnbTerminator {
    core: TerminatorCore,
}

impl LteEnbTerminator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: TerminatorCore::new(name),
        }
    }

    /// Resolves the LTE eNB device at the configured index on the attached node.
    pub fn net_device(&self) -> Result<LteEnbDevice, E2Error> {
        self.core
            .resolve_device(DeviceKind::LteEnb, |dev| dev.as_lte_enb())
    }
}

impl Default for LteEnbTerminator {
    fn default() -> Self {
        Self::new("E2NodeTerminatorLteEnb")
    }
}

impl E2NodeTerminator for LteEnbTerminator {
    fn node_type(&self) -> NodeType {
        NodeType::LteEnb
    }

    fn receive_command(&mut self, command: &Command) -> Result<CommandOutcome, E2Error> {
        if !self.core.is_active() {
            debug!("{}: inactive, ignoring {}", self.core.name(), command);
            return Ok(CommandOutcome::Ignored);
        }
        match command {
            Command::Lte2LteHandover(handover) => {
                let device = self.net_device()?;
                lock(&device)
                    .rrc
                    .send_handover_request(handover.target_rnti, handover.target_cell_id);
                info!("{}: executed {}", self.core.name(), command);
                Ok(CommandOutcome::Executed)
            }
        }
    }

    fn identity(&self) -> Result<NodeIdentity, E2Error> {
        let device = self.net_device()?;
        let cell_id = lock(&device).cell_id;
        Ok(NodeIdentity::LteEnb { cell_id })
    }

    fn core(&self) -> &TerminatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TerminatorCore {
        &mut self.core
    }
}
