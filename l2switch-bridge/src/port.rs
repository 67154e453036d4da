//! Switch ports
//!
//! Ports are created once from configuration. Only trunk ports carry a
//! spanning tree state; access ports always forward.

use l2switch_core::{Error, PortId, VlanId};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// VLAN membership of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlanMode {
    /// Carries tagged frames for every VLAN
    Trunk,
    /// Untagged member of a single VLAN
    Access(VlanId),
}

impl VlanMode {
    pub fn is_trunk(&self) -> bool {
        matches!(self, VlanMode::Trunk)
    }
}

impl FromStr for VlanMode {
    type Err = Error;

    /// `T` for trunk, a decimal VLAN id for access ports
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "T" {
            return Ok(VlanMode::Trunk);
        }

        s.parse::<VlanId>()
            .map(VlanMode::Access)
            .map_err(|_| Error::parsing(format!("Invalid VLAN mode '{}'", s)))
    }
}

impl fmt::Display for VlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanMode::Trunk => write!(f, "T"),
            VlanMode::Access(vlan) => write!(f, "{}", vlan),
        }
    }
}

/// Spanning tree state of a trunk port
///
/// The root port is not a separate state: it is a `Designated` port whose
/// index is recorded in the bridge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// Frames are never sent out of this port
    Blocked,
    /// Forwarding
    Designated,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Blocked => write!(f, "blocked"),
            PortState::Designated => write!(f, "designated"),
        }
    }
}

/// A switch port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Index used by the link transport
    pub id: PortId,
    /// Interface name
    pub name: String,
    /// VLAN membership
    pub mode: VlanMode,
}

/// All ports of a switch plus the spanning tree state of its trunks
#[derive(Debug, Clone, Default)]
pub struct PortTable {
    ports: Vec<Port>,
    states: BTreeMap<PortId, PortState>,
}

impl PortTable {
    /// Build the table from `(name, mode)` pairs in port index order.
    ///
    /// Every trunk starts `Designated`: a fresh switch assumes it is root.
    pub fn new<I, S>(ports: I) -> Self
    where
        I: IntoIterator<Item = (S, VlanMode)>,
        S: Into<String>,
    {
        let ports: Vec<Port> = ports
            .into_iter()
            .enumerate()
            .map(|(id, (name, mode))| Port {
                id,
                name: name.into(),
                mode,
            })
            .collect();

        let states = ports
            .iter()
            .filter(|port| port.mode.is_trunk())
            .map(|port| (port.id, PortState::Designated))
            .collect();

        Self { ports, states }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn get(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn mode(&self, id: PortId) -> Option<VlanMode> {
        self.ports.get(id).map(|port| port.mode)
    }

    /// Indices of all trunk ports, ascending
    pub fn trunk_ports(&self) -> Vec<PortId> {
        self.states.keys().copied().collect()
    }

    /// Spanning tree state, `None` for access ports
    pub fn state(&self, id: PortId) -> Option<PortState> {
        self.states.get(&id).copied()
    }

    /// Set the state of a trunk port, returning the previous state.
    ///
    /// Access ports have no state; the call is ignored and returns `None`.
    pub fn set_state(&mut self, id: PortId, state: PortState) -> Option<PortState> {
        self.states
            .get_mut(&id)
            .map(|current| std::mem::replace(current, state))
    }

    /// True only for trunk ports in the `Blocked` state
    pub fn is_blocked(&self, id: PortId) -> bool {
        self.state(id) == Some(PortState::Blocked)
    }
}
