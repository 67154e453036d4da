//! Reduced spanning tree engine
//!
//! Every switch starts out believing it is the root. While that belief holds
//! it advertises itself on every trunk once per hello interval. Receiving a
//! BPDU for a lower root id makes the switch adopt that root, remember the
//! port it came in on, and pass the news on. A switch that hears its own
//! advertisement come back blocks the port it arrived on.
//!
//! Trunk ports only have two states. The port leading to the root is kept
//! `Designated` and tracked separately through [`BridgeState::root_port`].

use l2switch_core::{BridgeId, MacAddr, PortId};
use l2switch_packet::Bpdu;
use tracing::{debug, info};

use crate::forwarding::Egress;
use crate::port::{PortState, PortTable};

/// Cost added for every hop towards the root
pub const LINK_COST: u32 = 10;

/// Election state of this bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeState {
    /// Own priority, fixed at startup
    pub bridge_id: BridgeId,
    /// Best root known so far
    pub root_id: BridgeId,
    /// Cost to reach `root_id`
    pub root_path_cost: u32,
    /// Trunk port towards the root, `None` while this bridge is root
    pub root_port: Option<PortId>,
}

impl BridgeState {
    pub fn new(bridge_id: BridgeId) -> Self {
        Self {
            bridge_id,
            root_id: bridge_id,
            root_path_cost: 0,
            root_port: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.root_id == self.bridge_id
    }
}

/// What a received BPDU did to the bridge state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpduVerdict {
    /// A lower root id was adopted
    BetterRoot,
    /// Advertisement for the root already known
    SameRoot,
    /// Our own advertisement came back, the port was blocked
    OwnBpdu,
    /// Worse or unrelated root, nothing changed
    Ignored,
}

/// Spanning tree engine for one switch
#[derive(Debug, Clone)]
pub struct Stp {
    state: BridgeState,
    mac: MacAddr,
}

impl Stp {
    /// `mac` is used as the source address of every BPDU sent
    pub fn new(bridge_id: BridgeId, mac: MacAddr) -> Self {
        Self {
            state: BridgeState::new(bridge_id),
            mac,
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn is_root(&self) -> bool {
        self.state.is_root()
    }

    /// The BPDU this bridge currently advertises
    pub fn advertisement(&self) -> Bpdu {
        Bpdu::new(
            self.state.root_id,
            self.state.root_path_cost,
            self.state.bridge_id,
        )
    }

    /// Periodic hello: only the root originates BPDUs.
    pub fn hello(&self, ports: &PortTable) -> Vec<Egress> {
        if !self.is_root() {
            return Vec::new();
        }

        let frame = Bpdu::new(self.state.bridge_id, 0, self.state.bridge_id).build(self.mac);
        ports
            .trunk_ports()
            .into_iter()
            .map(|port| Egress::new(port, frame.clone()))
            .collect()
    }

    /// Process a BPDU received on trunk `port`.
    ///
    /// Returns the verdict and the BPDUs to re-advertise.
    pub fn receive_bpdu(
        &mut self,
        port: PortId,
        bpdu: &Bpdu,
        ports: &mut PortTable,
    ) -> (BpduVerdict, Vec<Egress>) {
        // Taken before any update made below
        let was_root = self.state.is_root();
        let offered_cost = bpdu.root_path_cost.saturating_add(LINK_COST);
        let mut egress = Vec::new();

        debug!(
            port,
            %bpdu,
            root = self.state.root_id,
            cost = self.state.root_path_cost,
            "BPDU received"
        );

        let verdict = if bpdu.root_id < self.state.root_id {
            info!(
                old_root = self.state.root_id,
                new_root = bpdu.root_id,
                cost = offered_cost,
                root_port = port,
                "Root bridge changed"
            );
            self.state.root_id = bpdu.root_id;
            self.state.root_path_cost = offered_cost;
            self.state.root_port = Some(port);

            if was_root {
                for trunk in ports.trunk_ports() {
                    if trunk != port {
                        transition(ports, trunk, PortState::Blocked);
                    }
                }
            }

            if ports.is_blocked(port) {
                transition(ports, port, PortState::Designated);
            }

            let frame = self.advertisement().build(self.mac);
            egress.extend(
                ports
                    .trunk_ports()
                    .into_iter()
                    .filter(|&trunk| trunk != port)
                    .map(|trunk| Egress::new(trunk, frame.clone())),
            );

            BpduVerdict::BetterRoot
        } else if bpdu.root_id == self.state.root_id {
            if self.state.root_port == Some(port) {
                if offered_cost < self.state.root_path_cost {
                    debug!(
                        old_cost = self.state.root_path_cost,
                        new_cost = offered_cost,
                        "Shorter path to root"
                    );
                    self.state.root_path_cost = offered_cost;
                }
            } else if bpdu.root_path_cost > self.state.root_path_cost
                && ports.state(port) != Some(PortState::Designated)
            {
                transition(ports, port, PortState::Designated);
            }

            BpduVerdict::SameRoot
        } else if bpdu.bridge_id == self.state.bridge_id {
            transition(ports, port, PortState::Blocked);
            BpduVerdict::OwnBpdu
        } else {
            debug!(port, %bpdu, "BPDU ignored");
            return (BpduVerdict::Ignored, egress);
        };

        if self.state.is_root() {
            for trunk in ports.trunk_ports() {
                transition(ports, trunk, PortState::Designated);
            }
        }

        (verdict, egress)
    }
}

fn transition(ports: &mut PortTable, port: PortId, state: PortState) {
    match ports.set_state(port, state) {
        Some(previous) if previous != state => {
            let name = ports.get(port).map(|p| p.name.as_str()).unwrap_or("?");
            info!(port, name, from = %previous, to = %state, "Port state changed");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::VlanMode;
    use l2switch_packet::{decode_bpdu, EthernetHeader};

    const MAC: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

    // 0: Access(1), 1..=3: Trunk
    fn ports() -> PortTable {
        PortTable::new([
            ("r-0", VlanMode::Access(1)),
            ("rr-0-1", VlanMode::Trunk),
            ("rr-0-2", VlanMode::Trunk),
            ("rr-0-3", VlanMode::Trunk),
        ])
    }

    fn states(ports: &PortTable) -> Vec<Option<PortState>> {
        (0..ports.len()).map(|id| ports.state(id)).collect()
    }

    #[test]
    fn test_initial_state() {
        let stp = Stp::new(10, MAC);
        assert!(stp.is_root());
        assert_eq!(stp.state().root_id, 10);
        assert_eq!(stp.state().root_path_cost, 0);
        assert_eq!(stp.state().root_port, None);
    }

    #[test]
    fn test_hello_as_root() {
        let stp = Stp::new(10, MAC);
        let egress = stp.hello(&ports());

        assert_eq!(
            egress.iter().map(|e| e.port).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for e in &egress {
            let header = EthernetHeader::parse(&e.frame).unwrap();
            assert!(header.is_bpdu());
            assert_eq!(header.source, MAC);
            assert_eq!(decode_bpdu(&e.frame).unwrap(), Bpdu::new(10, 0, 10));
        }
    }

    #[test]
    fn test_hello_silent_when_not_root() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);

        assert!(stp.hello(&ports).is_empty());
    }

    #[test]
    fn test_better_root_from_root() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);

        let (verdict, egress) = stp.receive_bpdu(2, &Bpdu::new(5, 0, 5), &mut ports);

        assert_eq!(verdict, BpduVerdict::BetterRoot);
        assert_eq!(
            *stp.state(),
            BridgeState {
                bridge_id: 10,
                root_id: 5,
                root_path_cost: LINK_COST,
                root_port: Some(2),
            }
        );
        assert_eq!(
            states(&ports),
            vec![
                None,
                Some(PortState::Blocked),
                Some(PortState::Designated),
                Some(PortState::Blocked)
            ]
        );

        // re-advertised on every other trunk, blocked or not
        assert_eq!(
            egress.iter().map(|e| e.port).collect::<Vec<_>>(),
            vec![1, 3]
        );
        for e in &egress {
            assert_eq!(decode_bpdu(&e.frame).unwrap(), Bpdu::new(5, LINK_COST, 10));
        }
    }

    #[test]
    fn test_better_root_when_not_root_keeps_states() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(2, &Bpdu::new(5, 0, 5), &mut ports);
        ports.set_state(3, PortState::Designated);

        let (verdict, _) = stp.receive_bpdu(1, &Bpdu::new(2, 20, 7), &mut ports);

        assert_eq!(verdict, BpduVerdict::BetterRoot);
        assert_eq!(stp.state().root_port, Some(1));
        assert_eq!(stp.state().root_path_cost, 30);
        // not root before this BPDU: no demotion, new root port promoted
        assert_eq!(ports.state(1), Some(PortState::Designated));
        assert_eq!(ports.state(2), Some(PortState::Designated));
        assert_eq!(ports.state(3), Some(PortState::Designated));
    }

    #[test]
    fn test_same_root_shorter_path() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 40, 8), &mut ports);
        assert_eq!(stp.state().root_path_cost, 50);

        let (verdict, egress) = stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);
        assert_eq!(verdict, BpduVerdict::SameRoot);
        assert_eq!(stp.state().root_path_cost, LINK_COST);
        assert!(egress.is_empty());

        // a longer path on the root port never raises the cost
        stp.receive_bpdu(1, &Bpdu::new(5, 90, 8), &mut ports);
        assert_eq!(stp.state().root_path_cost, LINK_COST);
    }

    #[test]
    fn test_same_root_neighbour_further_away() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);
        assert_eq!(ports.state(2), Some(PortState::Blocked));

        let (verdict, _) = stp.receive_bpdu(2, &Bpdu::new(5, 20, 15), &mut ports);
        assert_eq!(verdict, BpduVerdict::SameRoot);
        assert_eq!(ports.state(2), Some(PortState::Designated));
    }

    #[test]
    fn test_same_root_neighbour_closer_keeps_block() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);

        stp.receive_bpdu(2, &Bpdu::new(5, 10, 15), &mut ports);
        assert_eq!(ports.state(2), Some(PortState::Blocked));
    }

    #[test]
    fn test_own_bpdu_blocks_port() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);
        ports.set_state(3, PortState::Designated);

        let (verdict, egress) = stp.receive_bpdu(3, &Bpdu::new(8, 20, 10), &mut ports);

        assert_eq!(verdict, BpduVerdict::OwnBpdu);
        assert_eq!(ports.state(3), Some(PortState::Blocked));
        assert!(egress.is_empty());
    }

    #[test]
    fn test_worse_root_ignored() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, 0, 5), &mut ports);
        let before = (*stp.state(), states(&ports));

        let (verdict, egress) = stp.receive_bpdu(2, &Bpdu::new(20, 0, 20), &mut ports);

        assert_eq!(verdict, BpduVerdict::Ignored);
        assert!(egress.is_empty());
        assert_eq!((*stp.state(), states(&ports)), before);
    }

    #[test]
    fn test_root_forces_designated() {
        let mut ports = ports();
        ports.set_state(2, PortState::Blocked);
        let mut stp = Stp::new(5, MAC);

        // own root echoed back by a neighbour
        let (verdict, _) = stp.receive_bpdu(1, &Bpdu::new(5, 10, 10), &mut ports);

        assert_eq!(verdict, BpduVerdict::SameRoot);
        assert!(stp.is_root());
        assert!(ports.trunk_ports().iter().all(|&p| !ports.is_blocked(p)));
    }

    #[test]
    fn test_cost_saturates() {
        let mut ports = ports();
        let mut stp = Stp::new(10, MAC);
        stp.receive_bpdu(1, &Bpdu::new(5, u32::MAX, 5), &mut ports);
        assert_eq!(stp.state().root_path_cost, u32::MAX);
    }
}
