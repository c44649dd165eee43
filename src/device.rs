use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Shared handle to an LTE UE device.
pub type LteUeDevice = Arc<Mutex<LteUeNetDevice>>;

/// Shared handle to an LTE eNB device.
pub type LteEnbDevice = Arc<Mutex<LteEnbNetDevice>>;

/// Shared handle to a wired device.
pub type WiredDevice = Arc<Mutex<WiredNetDevice>>;

/// Shared handle to a simulation node.
pub type NodeHandle = Arc<Node>;

/// Locks a device handle, recovering the data if a previous holder panicked.
pub fn lock<T>(device: &Mutex<T>) -> MutexGuard<'_, T> {
    device.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Capability of a network device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// LTE user equipment.
    LteUe,

    /// LTE base station.
    LteEnb,

    /// Wired interface.
    Wired,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::LteUe => write!(f, "LTE UE"),
            DeviceKind::LteEnb => write!(f, "LTE eNB"),
            DeviceKind::Wired => write!(f, "wired"),
        }
    }
}

/// Radio state of a simulated LTE UE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LteUeNetDevice {
    /// Subscriber identity of the UE.
    pub imsi: u64,

    /// RNTI assigned by the serving cell.
    pub rnti: u16,

    /// ID of the serving cell.
    pub cell_id: u16,
}

impl LteUeNetDevice {
    /// Creates a UE attached to `cell_id` under `rnti`.
    pub fn new(imsi: u64, rnti: u16, cell_id: u16) -> Self {
        Self {
            imsi,
            rnti,
            cell_id,
        }
    }
}

/// A handover request issued by an eNB RRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverRequest {
    /// RNTI of the UE to hand over.
    pub rnti: u16,

    /// Cell the UE should move to.
    pub target_cell_id: u16,
}

/// RRC entity of an eNB; records the handover requests it has sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LteEnbRrc {
    handover_requests: Vec<HandoverRequest>,
}

impl LteEnbRrc {
    /// Starts a handover of the UE with `rnti` to `target_cell_id`.
    pub fn send_handover_request(&mut self, rnti: u16, target_cell_id: u16) {
        self.handover_requests.push(HandoverRequest {
            rnti,
            target_cell_id,
        });
    }

    /// Handover requests sent so far, oldest first.
    pub fn handover_requests(&self) -> &[HandoverRequest] {
        &self.handover_requests
    }
}

/// A simulated LTE eNB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LteEnbNetDevice {
    /// ID of the cell served by this eNB.
    pub cell_id: u16,

    /// RRC entity of the eNB.
    pub rrc: LteEnbRrc,
}

impl LteEnbNetDevice {
    /// Creates an eNB serving `cell_id` with an idle RRC.
    pub fn new(cell_id: u16) -> Self {
        Self {
            cell_id,
            rrc: LteEnbRrc::default(),
        }
    }
}

/// A simulated point-to-point or CSMA device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiredNetDevice {
    /// Network address of the interface.
    pub address: String,
}

impl WiredNetDevice {
    /// Creates a wired device with the given address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// A network device installed on a node.
#[derive(Debug, Clone)]
pub enum NetDevice {
    /// An LTE UE device.
    LteUe(LteUeDevice),

    /// An LTE eNB device.
    LteEnb(LteEnbDevice),

    /// A wired device.
    Wired(WiredDevice),
}

impl NetDevice {
    /// Wraps an LTE UE device in a new shared handle.
    pub fn lte_ue(device: LteUeNetDevice) -> Self {
        NetDevice::LteUe(Arc::new(Mutex::new(device)))
    }

    /// Wraps an LTE eNB device in a new shared handle.
    pub fn lte_enb(device: LteEnbNetDevice) -> Self {
        NetDevice::LteEnb(Arc::new(Mutex::new(device)))
    }

    /// Wraps a wired device in a new shared handle.
    pub fn wired(device: WiredNetDevice) -> Self {
        NetDevice::Wired(Arc::new(Mutex::new(device)))
    }

    /// Capability of this device.
    pub fn kind(&self) -> DeviceKind {
        match self {
            NetDevice::LteUe(_) => DeviceKind::LteUe,
            NetDevice::LteEnb(_) => DeviceKind::LteEnb,
            NetDevice::Wired(_) => DeviceKind::Wired,
        }
    }

    /// Returns the LTE UE handle if this device has that capability.
    pub fn as_lte_ue(&self) -> Option<LteUeDevice> {
        match self {
            NetDevice::LteUe(dev) => Some(Arc::clone(dev)),
            _ => None,
        }
    }

    /// Returns the LTE eNB handle if this device has that capability.
    pub fn as_lte_enb(&self) -> Option<LteEnbDevice> {
        match self {
            NetDevice::LteEnb(dev) => Some(Arc::clone(dev)),
            _ => None,
        }
    }
}

/// A simulation node: an ID plus an ordered list of device slots.
///
/// The device list can change while terminators hold the node, so lookups
/// always go through the lock.
#[derive(Debug)]
pub struct Node {
    id: u32,
    devices: RwLock<Vec<NetDevice>>,
}

impl Node {
    /// Creates a node without devices.
    pub fn new(id: u32) -> NodeHandle {
        Arc::new(Self {
            id,
            devices: RwLock::new(Vec::new()),
        })
    }

    /// Creates a node with the given devices installed in order.
    pub fn with_devices(id: u32, devices: Vec<NetDevice>) -> NodeHandle {
        Arc::new(Self {
            id,
            devices: RwLock::new(devices),
        })
    }

    /// Simulation node ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Installs a device and returns its index.
    pub fn add_device(&self, device: NetDevice) -> u32 {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        devices.push(device);
        (devices.len() - 1) as u32
    }

    /// Replaces the device at `index`, returning the previous one.
    pub fn replace_device(&self, index: u32, device: NetDevice) -> Option<NetDevice> {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        devices
            .get_mut(index as usize)
            .map(|slot| std::mem::replace(slot, device))
    }

    /// Returns the device at `index`, if any.
    pub fn device(&self, index: u32) -> Option<NetDevice> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index as usize)
            .cloned()
    }

    /// Number of installed devices.
    pub fn n_devices(&self) -> u32 {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_slots() {
        let node = Node::new(7);
        assert_eq!(node.n_devices(), 0);
        assert!(node.device(0).is_none());

        let idx = node.add_device(NetDevice::wired(WiredNetDevice::new("10.1.1.1")));
        assert_eq!(idx, 0);
        let idx = node.add_device(NetDevice::lte_ue(LteUeNetDevice::new(1, 2, 3)));
        assert_eq!(idx, 1);

        assert_eq!(node.device(0).map(|d| d.kind()), Some(DeviceKind::Wired));
        assert!(node.device(0).and_then(|d| d.as_lte_ue()).is_none());
        assert!(node.device(1).and_then(|d| d.as_lte_ue()).is_some());

        let old = node.replace_device(0, NetDevice::lte_enb(LteEnbNetDevice::new(1)));
        assert_eq!(old.map(|d| d.kind()), Some(DeviceKind::Wired));
        assert_eq!(node.device(0).map(|d| d.kind()), Some(DeviceKind::LteEnb));
        assert!(node.replace_device(5, NetDevice::wired(WiredNetDevice::new("x"))).is_none());
    }
}
