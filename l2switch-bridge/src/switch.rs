//! The switch aggregate
//!
//! [`Switch`] owns every piece of mutable state of one switch. Both entry
//! points return the frames to transmit instead of sending them, so the
//! caller decides how they reach the wire.

use l2switch_core::{BridgeId, Error, MacAddr, PortId, Result};
use l2switch_packet::{Bpdu, EthernetFrame};
use tracing::{debug, trace, warn};

use crate::cam::MacTable;
use crate::forwarding::{self, Delivery, Egress};
use crate::port::PortTable;
use crate::stats::SwitchStats;
use crate::stp::{BridgeState, Stp};

/// One VLAN-aware switch running the reduced spanning tree
#[derive(Debug, Clone)]
pub struct Switch {
    mac: MacAddr,
    ports: PortTable,
    cam: MacTable,
    stp: Stp,
    stats: SwitchStats,
}

impl Switch {
    pub fn new(bridge_id: BridgeId, mac: MacAddr, ports: PortTable) -> Self {
        Self {
            mac,
            ports,
            cam: MacTable::new(),
            stp: Stp::new(bridge_id, mac),
            stats: SwitchStats::new(),
        }
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn ports(&self) -> &PortTable {
        &self.ports
    }

    pub fn mac_table(&self) -> &MacTable {
        &self.cam
    }

    pub fn bridge(&self) -> &BridgeState {
        self.stp.state()
    }

    pub fn stats(&self) -> SwitchStats {
        self.stats
    }

    /// Handle one frame received on `port`.
    ///
    /// Frames too short to decode are counted and returned as errors; the
    /// switch state is left untouched.
    pub fn handle_frame(&mut self, port: PortId, data: &[u8]) -> Result<Vec<Egress>> {
        let Some(mode) = self.ports.mode(port) else {
            return Err(Error::link(format!("Frame received on unknown port {}", port)));
        };

        let frame = match EthernetFrame::parse(data) {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.malformed += 1;
                return Err(e);
            }
        };

        if frame.header.is_bpdu() {
            if !mode.is_trunk() {
                debug!(port, src = %frame.header.source, "BPDU on access port discarded");
                return Ok(Vec::new());
            }

            let bpdu = match Bpdu::parse(data) {
                Ok(bpdu) => bpdu,
                Err(e) => {
                    self.stats.malformed += 1;
                    return Err(e);
                }
            };

            self.stats.bpdus_received += 1;
            let (verdict, egress) = self.stp.receive_bpdu(port, &bpdu, &mut self.ports);
            trace!(port, ?verdict, "BPDU handled");
            self.stats.bpdus_sent += egress.len() as u64;
            return Ok(egress);
        }

        self.stats.frames_received += 1;
        let result = forwarding::forward(&frame, port, &self.ports, &mut self.cam)?;

        match result.delivery {
            Delivery::Flood => self.stats.floods += 1,
            Delivery::Unicast(_) => self.stats.unicast_hits += 1,
        }
        if result.egress.is_empty() {
            self.stats.frames_dropped += 1;
        }
        self.stats.frames_forwarded += result.egress.len() as u64;

        Ok(result.egress)
    }

    /// Periodic hello tick
    pub fn on_tick(&mut self) -> Vec<Egress> {
        let egress = self.stp.hello(&self.ports);
        self.stats.bpdus_sent += egress.len() as u64;
        egress
    }

    /// Count a frame the transport failed to send
    pub fn record_send_error(&mut self, port: PortId, error: &Error) {
        self.stats.send_errors += 1;
        warn!(port, error = %error, "Failed to send frame");
    }
}
