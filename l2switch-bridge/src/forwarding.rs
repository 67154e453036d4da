//! VLAN-aware forwarding decision
//!
//! For each candidate egress port the ingress/egress VLAN modes decide
//! whether the frame goes out and how its tag is rewritten:
//!
//! | ingress      | egress        | condition            | action     |
//! |--------------|---------------|----------------------|------------|
//! | Trunk        | Trunk         | egress not blocked   | unchanged  |
//! | Trunk        | Access(v)     | frame tagged with v  | strip tag  |
//! | Access(v)    | Trunk         | egress not blocked   | push tag v |
//! | Access(v)    | Access(w)     | v == w               | unchanged  |

use bytes::Bytes;
use l2switch_core::{Error, PortId, Result, VlanId};
use l2switch_packet::{vlan, EthernetFrame};
use tracing::trace;

use crate::cam::MacTable;
use crate::port::{PortState, PortTable, VlanMode};

/// A frame to transmit on a port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Egress {
    pub port: PortId,
    pub frame: Bytes,
}

impl Egress {
    pub fn new(port: PortId, frame: Bytes) -> Self {
        Self { port, frame }
    }
}

/// Tag rewrite applied to a forwarded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    /// Send the frame as received
    Unchanged,
    /// Remove the VLAN tag
    Strip,
    /// Insert a tag for the given VLAN
    Push(VlanId),
}

/// How a data frame was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Broadcast or unknown destination, sent to every eligible port
    Flood,
    /// Sent only to the learned port of the destination
    Unicast(PortId),
}

/// Outcome of forwarding one data frame
#[derive(Debug, Clone)]
pub struct Forwarding {
    pub delivery: Delivery,
    pub egress: Vec<Egress>,
}

/// Apply the decision table to one candidate egress port.
///
/// `frame_vlan` is the VLAN id carried in the frame's tag, if any. It only
/// matters for trunk ingress; access ingress is classified by the port VLAN.
pub fn decide(
    ingress: VlanMode,
    frame_vlan: Option<VlanId>,
    egress: VlanMode,
    egress_state: Option<PortState>,
) -> Option<TagAction> {
    let blocked = egress_state == Some(PortState::Blocked);

    match (ingress, egress) {
        (VlanMode::Trunk, VlanMode::Trunk) => (!blocked).then_some(TagAction::Unchanged),
        (VlanMode::Trunk, VlanMode::Access(out)) => {
            (frame_vlan == Some(out)).then_some(TagAction::Strip)
        }
        (VlanMode::Access(vlan), VlanMode::Trunk) => (!blocked).then_some(TagAction::Push(vlan)),
        (VlanMode::Access(vlan), VlanMode::Access(out)) => {
            (vlan == out).then_some(TagAction::Unchanged)
        }
    }
}

/// Rewritten copies of one frame, built at most once each
struct Rewrites<'a> {
    raw: &'a [u8],
    unchanged: Option<Bytes>,
    stripped: Option<Bytes>,
    tagged: Option<Bytes>,
}

impl<'a> Rewrites<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self {
            raw,
            unchanged: None,
            stripped: None,
            tagged: None,
        }
    }

    fn get(&mut self, action: TagAction) -> Result<Bytes> {
        let raw = self.raw;
        let slot = match action {
            TagAction::Unchanged => &mut self.unchanged,
            TagAction::Strip => &mut self.stripped,
            TagAction::Push(_) => &mut self.tagged,
        };

        if let Some(frame) = slot {
            return Ok(frame.clone());
        }

        let frame = match action {
            TagAction::Unchanged => Bytes::copy_from_slice(raw),
            TagAction::Strip => vlan::strip_tag(raw)?,
            TagAction::Push(vlan) => vlan::push_tag(raw, vlan)?,
        };
        *slot = Some(frame.clone());
        Ok(frame)
    }
}

/// Learn the source of a data frame and compute where it goes.
pub fn forward(
    frame: &EthernetFrame<'_>,
    ingress: PortId,
    ports: &PortTable,
    cam: &mut MacTable,
) -> Result<Forwarding> {
    let ingress_mode = ports
        .mode(ingress)
        .ok_or_else(|| Error::link(format!("Frame received on unknown port {}", ingress)))?;
    let header = &frame.header;

    cam.learn(header.source, ingress);

    let known = if header.destination.is_broadcast() {
        None
    } else {
        cam.lookup(&header.destination)
    };

    let (delivery, candidates): (Delivery, Vec<PortId>) = match known {
        Some(port) => (Delivery::Unicast(port), vec![port]),
        None => (
            Delivery::Flood,
            ports
                .iter()
                .map(|port| port.id)
                .filter(|&id| id != ingress)
                .collect(),
        ),
    };

    let mut rewrites = Rewrites::new(frame.as_bytes());
    let mut egress = Vec::with_capacity(candidates.len());

    for port in candidates {
        let Some(mode) = ports.mode(port) else {
            continue;
        };

        match decide(ingress_mode, header.vlan_id, mode, ports.state(port)) {
            Some(action) => {
                trace!(port, ?action, dst = %header.destination, "forwarding");
                egress.push(Egress::new(port, rewrites.get(action)?));
            }
            None => trace!(port, dst = %header.destination, "not eligible"),
        }
    }

    Ok(Forwarding { delivery, egress })
}
