use crate::{
    container::TerminatorContainer,
    device::NodeHandle,
    lte_enb::LteEnbTerminator,
    lte_ue::LteUeTerminator,
    terminator::E2NodeTerminator,
    types::NodeType,
    wired::WiredTerminator,
    E2Error,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// Constructor for a terminator variant, taking the terminator name.
pub type TerminatorFactory = fn(String) -> Box<dyn E2NodeTerminator>;

/// Maps a node type to the constructor of its terminator variant.
pub fn terminator_factory(node_type: NodeType) -> TerminatorFactory {
    match node_type {
        NodeType::Wired => new_wired,
        NodeType::LteUe => new_lte_ue,
        NodeType::LteEnb => new_lte_enb,
    }
}

fn new_wired(name: String) -> Box<dyn E2NodeTerminator> {
    Box::new(WiredTerminator::new(name))
}

fn new_lte_ue(name: String) -> Box<dyn E2NodeTerminator> {
    Box::new(LteUeTerminator::new(name))
}

fn new_lte_enb(name: String) -> Box<dyn E2NodeTerminator> {
    Box::new(LteEnbTerminator::new(name))
}

/// One `[[terminator]]` entry of a topology file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminatorConfig {
    pub node_type: NodeType,

    /// Simulation node ID to attach to.
    pub node: u32,

    #[serde(default)]
    pub net_device_index: u32,

    /// Defaults to `E2NodeTerminator<NodeType>`.
    #[serde(default)]
    pub name: Option<String>,
}

impl TerminatorConfig {
    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("E2NodeTerminator{}", self.node_type))
    }
}

/// Wiring of E2 node terminators onto simulation nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default, rename = "terminator")]
    pub terminators: Vec<TerminatorConfig>,
}

impl TopologyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, E2Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, E2Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builds and attaches every configured terminator.
    ///
    /// # Errors
    /// Returns [`E2Error::UnknownNode`] if an entry names a node not in `nodes`.
    pub fn build_terminators(&self, nodes: &[NodeHandle]) -> Result<TerminatorContainer, E2Error> {
        let by_id: HashMap<u32, &NodeHandle> = nodes.iter().map(|n| (n.id(), n)).collect();
        let mut container = TerminatorContainer::new();
        for entry in &self.terminators {
            let node = by_id.get(&entry.node).ok_or(E2Error::UnknownNode(entry.node))?;
            let mut terminator = terminator_factory(entry.node_type)(entry.name());
            terminator.attach((*node).clone(), entry.net_device_index);
            debug!("built {} terminator {:?}", entry.node_type, terminator.name());
            container.add(terminator);
        }
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Node;

    #[test]
    fn test_factory_covers_every_node_type() {
        for node_type in [NodeType::Wired, NodeType::LteUe, NodeType::LteEnb] {
            let terminator = terminator_factory(node_type)("t".to_string());
            assert_eq!(terminator.node_type(), node_type);
            assert!(!terminator.is_active());
        }
    }

    #[test]
    fn test_default_names_and_device_index() {
        let config = TopologyConfig::from_toml_str(
            r#"
            [[terminator]]
            node_type = "wired"
            node = 5
            "#,
        )
        .unwrap();
        let entry = &config.terminators[0];
        assert_eq!(entry.net_device_index, 0);
        assert_eq!(entry.name(), "E2NodeTerminatorWired");

        let container = config.build_terminators(&[Node::new(5)]).unwrap();
        assert_eq!(container.len(), 1);
        assert_eq!(container.get(0).unwrap().node().map(|n| n.id()), Some(5));
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let config = TopologyConfig {
            terminators: vec![TerminatorConfig {
                node_type: NodeType::LteUe,
                node: 3,
                net_device_index: 0,
                name: None,
            }],
        };
        assert!(matches!(
            config.build_terminators(&[Node::new(1)]),
            Err(E2Error::UnknownNode(3))
        ));
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            TopologyConfig::from_toml_str("[[terminator]]\nnode_type = \"gnb\"\nnode = 1\n"),
            Err(E2Error::Config(_))
        ));
        assert!(matches!(
            TopologyConfig::from_file("/nonexistent/topology.toml"),
            Err(E2Error::Io(_))
        ));
    }
}
