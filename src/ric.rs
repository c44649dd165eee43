use crate::{
    container::TerminatorContainer,
    terminator::E2NodeTerminator,
    types::{
        Command, CommandOutcome, E2Message, E2NodeId, NodeIdentity, NodeType, RegistrationRequest,
        Report, ReportPayload, RsrpRsrq,
    },
    E2Error,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What the RIC knows about a registered E2 node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node type given at registration.
    pub node_type: NodeType,

    /// Simulator-level identity given at registration.
    pub identity: NodeIdentity,

    /// False once the node has deregistered.
    pub registered: bool,
}

/// In-memory store of E2 node registrations, received reports and sent commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRepository {
    /// Next E2 node ID to try when allocating. IDs start at 1; 0 means unregistered.
    next_id: E2NodeId,

    nodes: BTreeMap<E2NodeId, NodeRecord>,

    reports: BTreeMap<E2NodeId, Vec<Report>>,

    /// Every LTE UE cell info report, oldest first, as (reporter, cell ID, RNTI).
    cell_info: Vec<(E2NodeId, u16, u16)>,

    /// Commands routed by the RIC, oldest first.
    commands: Vec<Command>,
}

impl Default for DataRepository {
    fn default() -> Self {
        Self {
            next_id: 1,
            nodes: BTreeMap::new(),
            reports: BTreeMap::new(),
            cell_info: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl DataRepository {
    /// Registers a node. An ID of 0 allocates a new E2 node ID; any other ID is kept.
    pub fn register(&mut self, request: &RegistrationRequest) -> E2NodeId {
        let e2_node_id = if request.e2_node_id == 0 {
            self.allocate_id()
        } else {
            self.next_id = self.next_id.max(request.e2_node_id.saturating_add(1));
            request.e2_node_id
        };
        self.nodes.insert(
            e2_node_id,
            NodeRecord {
                node_type: request.node_type,
                identity: request.identity,
                registered: true,
            },
        );
        e2_node_id
    }

    /// Marks a node as deregistered.
    pub fn deregister(&mut self, e2_node_id: E2NodeId) -> Result<E2NodeId, E2Error> {
        let record = self
            .nodes
            .get_mut(&e2_node_id)
            .ok_or(E2Error::UnknownE2Node(e2_node_id))?;
        record.registered = false;
        Ok(e2_node_id)
    }

    pub fn is_registered(&self, e2_node_id: E2NodeId) -> bool {
        self.nodes.get(&e2_node_id).is_some_and(|r| r.registered)
    }

    pub fn node(&self, e2_node_id: E2NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&e2_node_id)
    }

    /// E2 node IDs of all registered nodes of the given type.
    pub fn registered_nodes(&self, node_type: NodeType) -> Vec<E2NodeId> {
        self.nodes
            .iter()
            .filter(|(_, r)| r.registered && r.node_type == node_type)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Stores a report. Reports from unregistered nodes are discarded.
    pub fn save_report(&mut self, report: Report) -> bool {
        if !self.is_registered(report.reporter) {
            return false;
        }
        if let ReportPayload::LteUeCellInfo { cell_id, rnti } = report.payload {
            self.cell_info.push((report.reporter, cell_id, rnti));
        }
        self.reports.entry(report.reporter).or_default().push(report);
        true
    }

    /// Records a command sent by the RIC.
    pub fn log_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Commands sent by the RIC, oldest first.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// E2 node ID of the UE that most recently reported being served by
    /// `cell_id` under `rnti`.
    pub fn lte_ue_e2_node_id_from_cell_info(&self, cell_id: u16, rnti: u16) -> Option<E2NodeId> {
        self.cell_info
            .iter()
            .rev()
            .find(|&&(_, c, r)| c == cell_id && r == rnti)
            .map(|&(id, _, _)| id)
    }

    /// Latest (cell ID, RNTI) reported by an LTE UE.
    pub fn lte_ue_cell_info(&self, e2_node_id: E2NodeId) -> Option<(u16, u16)> {
        self.reports(e2_node_id).iter().rev().find_map(|r| match r.payload {
            ReportPayload::LteUeCellInfo { cell_id, rnti } => Some((cell_id, rnti)),
            _ => None,
        })
    }

    /// Cell ID of a registered LTE eNB.
    pub fn lte_enb_cell_info(&self, e2_node_id: E2NodeId) -> Option<u16> {
        match self.nodes.get(&e2_node_id) {
            Some(NodeRecord {
                identity: NodeIdentity::LteEnb { cell_id },
                registered: true,
                ..
            }) => Some(*cell_id),
            _ => None,
        }
    }

    /// Latest application loss reported by a node.
    pub fn app_loss(&self, e2_node_id: E2NodeId) -> Option<f64> {
        self.reports(e2_node_id).iter().rev().find_map(|r| match r.payload {
            ReportPayload::AppLoss { loss } => Some(loss),
            _ => None,
        })
    }

    /// RSRP/RSRQ measurements of the most recent report time of an LTE UE.
    pub fn lte_ue_rsrp_rsrq(&self, e2_node_id: E2NodeId) -> Vec<RsrpRsrq> {
        let measurements: Vec<(f64, RsrpRsrq)> = self
            .reports(e2_node_id)
            .iter()
            .filter_map(|r| match r.payload {
                ReportPayload::LteUeRsrpRsrq(m) => Some((r.time, m)),
                _ => None,
            })
            .collect();
        let Some(latest) = measurements.iter().map(|&(t, _)| t).reduce(f64::max) else {
            return Vec::new();
        };
        measurements
            .into_iter()
            .filter(|&(t, _)| t == latest)
            .map(|(_, m)| m)
            .collect()
    }

    /// Returns the first free ID at or after `next_id`, wrapping past `u64::MAX` to 1.
    fn allocate_id(&mut self) -> E2NodeId {
        let mut id = self.next_id;
        while id == 0 || self.nodes.contains_key(&id) {
            id = id.checked_add(1).unwrap_or(1);
        }
        self.next_id = id.saturating_add(1);
        id
    }

    /// All reports received from a node, oldest first.
    pub fn reports(&self, e2_node_id: E2NodeId) -> &[Report] {
        self.reports.get(&e2_node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recent report received from a node.
    pub fn latest_report(&self, e2_node_id: E2NodeId) -> Option<&Report> {
        self.reports(e2_node_id).last()
    }
}

/// The RIC end of the E2 interface: registers nodes, collects reports and
/// routes commands to the terminator of the addressed node.
#[derive(Default)]
pub struct NearRtRic {
    active: bool,

    terminators: TerminatorContainer,

    /// E2 node ID -> terminator slot.
    routes: HashMap<E2NodeId, usize>,

    repository: DataRepository,
}

impl NearRtRic {
    /// Creates an inactive RIC.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self) {
        info!("Near-RT RIC activated");
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        info!("Near-RT RIC deactivated");
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Takes ownership of a terminator and returns its slot.
    pub fn attach(&mut self, terminator: Box<dyn E2NodeTerminator>) -> usize {
        self.terminators.add(terminator)
    }

    /// Takes ownership of every terminator in `container`.
    pub fn attach_all(&mut self, container: TerminatorContainer) {
        self.terminators.extend(container);
    }

    pub fn terminator(&self, slot: usize) -> Option<&dyn E2NodeTerminator> {
        self.terminators.get(slot)
    }

    pub fn terminator_mut(
        &mut self,
        slot: usize,
    ) -> Option<&mut (dyn E2NodeTerminator + 'static)> {
        self.terminators.get_mut(slot)
    }

    pub fn terminators(&self) -> &TerminatorContainer {
        &self.terminators
    }

    pub fn repository(&self) -> &DataRepository {
        &self.repository
    }

    /// Activates the terminator in `slot` and registers it.
    pub fn activate_node(&mut self, slot: usize) -> Result<(), E2Error> {
        let messages = self.slot_mut(slot)?.activate()?;
        self.process(slot, messages)
    }

    /// Deactivates the terminator in `slot` and deregisters it.
    pub fn deactivate_node(&mut self, slot: usize) -> Result<(), E2Error> {
        let messages = self.slot_mut(slot)?.deactivate();
        self.process(slot, messages)
    }

    /// Activates every terminator, stopping at the first one that fails.
    pub fn activate_all(&mut self) -> Result<(), E2Error> {
        for slot in 0..self.terminators.len() {
            self.activate_node(slot)?;
        }
        Ok(())
    }

    /// Re-sends the registration request of the terminator in `slot`.
    ///
    /// Inactive terminators send nothing. An active terminator that registered
    /// while the RIC was inactive becomes routable here.
    pub fn register_node(&mut self, slot: usize) -> Result<(), E2Error> {
        let messages = self.slot_mut(slot)?.register()?;
        self.process(slot, messages)
    }

    /// Re-sends the registration requests of every terminator.
    pub fn register_all(&mut self) -> Result<(), E2Error> {
        for slot in 0..self.terminators.len() {
            self.register_node(slot)?;
        }
        Ok(())
    }

    pub fn deactivate_all(&mut self) -> Result<(), E2Error> {
        for slot in 0..self.terminators.len() {
            self.deactivate_node(slot)?;
        }
        Ok(())
    }

    /// Collects the buffered reports of the terminator in `slot`.
    pub fn flush_reports(&mut self, slot: usize) -> Result<(), E2Error> {
        let messages = self.slot_mut(slot)?.send_reports();
        self.process(slot, messages)
    }

    pub fn flush_all_reports(&mut self) -> Result<(), E2Error> {
        for slot in 0..self.terminators.len() {
            self.flush_reports(slot)?;
        }
        Ok(())
    }

    /// Sends a command to the terminator registered under its target E2 node ID.
    ///
    /// # Errors
    /// Returns [`E2Error::UnknownE2Node`] if no terminator is registered under
    /// that ID, or any error raised by the terminator while executing it.
    pub fn send_command(&mut self, command: &Command) -> Result<CommandOutcome, E2Error> {
        if !self.active {
            debug!("Near-RT RIC inactive, dropping {}", command);
            return Ok(CommandOutcome::Ignored);
        }
        let target = command.target_e2_node_id();
        let slot = *self.routes.get(&target).ok_or(E2Error::UnknownE2Node(target))?;
        debug!("sending {} to slot {}", command, slot);
        self.repository.log_command(command.clone());
        self.slot_mut(slot)?.receive_command(command)
    }

    /// Sends each command in order, collecting the individual results.
    pub fn process_commands(
        &mut self,
        commands: &[Command],
    ) -> Vec<Result<CommandOutcome, E2Error>> {
        commands.iter().map(|c| self.send_command(c)).collect()
    }

    fn slot_mut(
        &mut self,
        slot: usize,
    ) -> Result<&mut (dyn E2NodeTerminator + 'static), E2Error> {
        self.terminators.get_mut(slot).ok_or(E2Error::InvalidSlot(slot))
    }

    fn process(&mut self, slot: usize, messages: Vec<E2Message>) -> Result<(), E2Error> {
        if !self.active {
            if !messages.is_empty() {
                debug!(
                    "Near-RT RIC inactive, dropping {} message(s) from slot {}",
                    messages.len(),
                    slot
                );
            }
            return Ok(());
        }
        for message in messages {
            match message {
                E2Message::RegistrationRequest(request) => {
                    let e2_node_id = self.repository.register(&request);
                    self.routes.insert(e2_node_id, slot);
                    info!(
                        "registered {} node {:?} as E2 node {}",
                        request.node_type, request.identity, e2_node_id
                    );
                    self.slot_mut(slot)?.receive_registration_response(e2_node_id);
                }
                E2Message::DeregistrationRequest(e2_node_id) => {
                    let deregistered = match self.repository.deregister(e2_node_id) {
                        Ok(id) => id,
                        Err(e) => {
                            warn!("deregistration from slot {} failed: {}", slot, e);
                            0
                        }
                    };
                    self.routes.remove(&e2_node_id);
                    self.slot_mut(slot)?.receive_deregistration_response(deregistered);
                }
                E2Message::Report(report) => {
                    let reporter = report.reporter;
                    if !self.repository.save_report(report) {
                        debug!("discarding report from unregistered E2 node {}", reporter);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(e2_node_id: E2NodeId) -> RegistrationRequest {
        RegistrationRequest {
            node_type: NodeType::LteUe,
            e2_node_id,
            identity: NodeIdentity::LteUe { imsi: 1 },
        }
    }

    #[test]
    fn test_repository_registration_ids() {
        let mut repo = DataRepository::default();
        assert_eq!(repo.register(&request(0)), 1);
        assert_eq!(repo.register(&request(0)), 2);

        // Refreshing a registration keeps the ID.
        assert_eq!(repo.register(&request(2)), 2);
        assert_eq!(repo.register(&request(10)), 10);
        assert_eq!(repo.register(&request(0)), 11);

        assert_eq!(repo.deregister(2).unwrap(), 2);
        assert!(!repo.is_registered(2));
        assert!(repo.node(2).is_some());
        assert!(matches!(repo.deregister(5), Err(E2Error::UnknownE2Node(5))));
        assert_eq!(repo.registered_nodes(NodeType::LteUe), vec![1, 10, 11]);
    }

    #[test]
    fn test_repository_max_id_does_not_overflow() {
        let mut repo = DataRepository::default();
        assert_eq!(repo.register(&request(0)), 1);
        assert_eq!(repo.register(&request(E2NodeId::MAX)), E2NodeId::MAX);
        assert_eq!(repo.register(&request(E2NodeId::MAX)), E2NodeId::MAX);

        // Allocation wraps past the taken maximum and skips ID 1.
        assert_eq!(repo.register(&request(0)), 2);
        assert_eq!(repo.register(&request(0)), 3);
        assert_eq!(
            repo.registered_nodes(NodeType::LteUe),
            vec![1, 2, 3, E2NodeId::MAX]
        );
    }

    fn report(reporter: E2NodeId, time: f64, payload: ReportPayload) -> Report {
        Report {
            reporter,
            time,
            payload,
        }
    }

    fn measurement(cell_id: u16, rsrp: f64, is_serving_cell: bool) -> RsrpRsrq {
        RsrpRsrq {
            rnti: 7,
            cell_id,
            rsrp,
            rsrq: -10.0,
            is_serving_cell,
            component_carrier_id: 0,
        }
    }

    #[test]
    fn test_repository_cell_info_queries() {
        let mut repo = DataRepository::default();
        let ue_a = repo.register(&request(0));
        let ue_b = repo.register(&request(0));
        let enb = repo.register(&RegistrationRequest {
            node_type: NodeType::LteEnb,
            e2_node_id: 0,
            identity: NodeIdentity::LteEnb { cell_id: 4 },
        });

        let cell_info = |cell_id, rnti| ReportPayload::LteUeCellInfo { cell_id, rnti };
        assert!(repo.save_report(report(ue_a, 1.0, cell_info(4, 7))));
        assert_eq!(repo.lte_ue_e2_node_id_from_cell_info(4, 7), Some(ue_a));

        // The most recent report wins once an RNTI is reused.
        assert!(repo.save_report(report(ue_b, 2.0, cell_info(4, 7))));
        assert_eq!(repo.lte_ue_e2_node_id_from_cell_info(4, 7), Some(ue_b));
        assert_eq!(repo.lte_ue_e2_node_id_from_cell_info(4, 8), None);
        assert_eq!(repo.lte_ue_cell_info(ue_a), Some((4, 7)));
        assert_eq!(repo.lte_ue_cell_info(enb), None);

        // Reports from unknown nodes never reach the index.
        assert!(!repo.save_report(report(99, 3.0, cell_info(5, 1))));
        assert_eq!(repo.lte_ue_e2_node_id_from_cell_info(5, 1), None);

        assert_eq!(repo.lte_enb_cell_info(enb), Some(4));
        assert_eq!(repo.lte_enb_cell_info(ue_a), None);
        repo.deregister(enb).unwrap();
        assert_eq!(repo.lte_enb_cell_info(enb), None);
    }

    #[test]
    fn test_repository_app_loss_and_rsrp_rsrq() {
        let mut repo = DataRepository::default();
        let ue = repo.register(&request(0));
        assert_eq!(repo.app_loss(ue), None);
        assert!(repo.lte_ue_rsrp_rsrq(ue).is_empty());

        repo.save_report(report(ue, 1.0, ReportPayload::AppLoss { loss: 0.25 }));
        repo.save_report(report(ue, 2.0, ReportPayload::AppLoss { loss: 0.5 }));
        assert_eq!(repo.app_loss(ue), Some(0.5));

        let rsrp = ReportPayload::LteUeRsrpRsrq;
        repo.save_report(report(ue, 1.0, rsrp(measurement(1, -90.0, true))));
        repo.save_report(report(ue, 3.0, rsrp(measurement(1, -95.0, true))));
        repo.save_report(report(ue, 3.0, rsrp(measurement(2, -85.0, false))));
        assert_eq!(
            repo.lte_ue_rsrp_rsrq(ue),
            vec![measurement(1, -95.0, true), measurement(2, -85.0, false)]
        );
        assert_eq!(repo.app_loss(ue), Some(0.5));
    }

    #[test]
    fn test_repository_command_log() {
        let mut repo = DataRepository::default();
        assert!(repo.commands().is_empty());
        let command = Command::Lte2LteHandover(crate::types::Lte2LteHandover {
            target_e2_node_id: 3,
            target_cell_id: 2,
            target_rnti: 1,
        });
        repo.log_command(command.clone());
        assert_eq!(repo.commands(), &[command]);
    }
}
