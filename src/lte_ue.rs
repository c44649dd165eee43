use crate::{
    device::{lock, DeviceKind, LteUeDevice},
    terminator::{E2NodeTerminator, TerminatorCore},
    types::{Command, CommandOutcome, NodeIdentity, NodeType},
    E2Error,
};
use log::{debug, warn};

/// E2 node terminator for an LTE UE.
#[derive(Debug, Clone)]
pub struct LteUeTerminator {
    core: TerminatorCore,
}

impl LteUeTerminator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: TerminatorCore::new(name),
        }
    }

    /// Resolves the LTE UE device at the configured index on the attached node.
    ///
    /// # Errors
    /// Returns an error if the terminator is unattached, the slot is empty, or
    /// the device there is not an LTE UE.
    pub fn net_device(&self) -> Result<LteUeDevice, E2Error> {
        self.core
            .resolve_device(DeviceKind::LteUe, |dev| dev.as_lte_ue())
            .map_err(|e| {
                warn!("{}: unable to find appropriate network device: {}", self.core.name(), e);
                e
            })
    }
}

impl Default for LteUeTerminator {
    fn default() -> Self {
        Self::new("E2NodeTerminatorLteUe")
    }
}

impl E2NodeTerminator for LteUeTerminator {
    fn node_type(&self) -> NodeType {
        NodeType::LteUe
    }

    fn receive_command(&mut self, command: &Command) -> Result<CommandOutcome, E2Error> {
        if !self.core.is_active() {
            debug!("{}: inactive, ignoring {}", self.core.name(), command);
            return Ok(CommandOutcome::Ignored);
        }
        match command {
            Command::Lte2LteHandover(_) => {
                warn!("{}: no action for {}", self.core.name(), command);
                Ok(CommandOutcome::Unsupported)
            }
        }
    }

    fn identity(&self) -> Result<NodeIdentity, E2Error> {
        let device = self.net_device()?;
        let imsi = lock(&device).imsi;
        Ok(NodeIdentity::LteUe { imsi })
    }

    fn core(&self) -> &TerminatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TerminatorCore {
        &mut self.core
    }
}
