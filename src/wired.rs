use crate::{
    terminator::{E2NodeTerminator, TerminatorCore},
    types::{Command, CommandOutcome, NodeIdentity, NodeType},
    E2Error,
};
use log::{debug, warn};

/// E2 node terminator for a wired node, identified by its simulation node ID.
#[derive(Debug, Clone)]
pub struct WiredTerminator {
    core: TerminatorCore,
}

impl WiredTerminator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: TerminatorCore::new(name),
        }
    }
}

impl Default for WiredTerminator {
    fn default() -> Self {
        Self::new("E2NodeTerminatorWired")
    }
}

impl E2NodeTerminator for WiredTerminator {
    fn node_type(&self) -> NodeType {
        NodeType::Wired
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
        let node = self.core.node().ok_or(E2Error::NotAttached)?;
        Ok(NodeIdentity::Wired { node_id: node.id() })
    }

    fn core(&self) -> &TerminatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TerminatorCore {
        &mut self.core
    }
}
