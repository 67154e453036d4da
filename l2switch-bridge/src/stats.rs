//! Switch counters

use std::fmt;

/// Counters kept by a [`Switch`](crate::Switch)
///
/// Owned by the switch and only mutated from the dispatch task, so plain
/// integers are enough. Callers get a copy through `Switch::stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchStats {
    /// Data frames received
    pub frames_received: u64,
    /// Egress copies of data frames
    pub frames_forwarded: u64,
    /// Data frames flooded
    pub floods: u64,
    /// Data frames sent to a learned port
    pub unicast_hits: u64,
    /// Data frames with no eligible egress port
    pub frames_dropped: u64,
    /// BPDUs processed
    pub bpdus_received: u64,
    /// BPDUs originated or re-advertised
    pub bpdus_sent: u64,
    /// Frames too short to decode
    pub malformed: u64,
    /// Transport send failures
    pub send_errors: u64,
}

impl SwitchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of received data frames that went nowhere, in percent
    pub fn drop_rate(&self) -> f64 {
        if self.frames_received == 0 {
            return 0.0;
        }
        (self.frames_dropped as f64 / self.frames_received as f64) * 100.0
    }

    /// Human-readable multi-line summary
    pub fn format(&self) -> String {
        format!(
            "Received: {} frames ({} malformed)\n\
             Forwarded: {} copies ({} floods, {} unicast)\n\
             Dropped: {} frames ({:.2}%)\n\
             BPDUs: {} received, {} sent\n\
             Send errors: {}",
            self.frames_received,
            self.malformed,
            self.frames_forwarded,
            self.floods,
            self.unicast_hits,
            self.frames_dropped,
            self.drop_rate(),
            self.bpdus_received,
            self.bpdus_sent,
            self.send_errors
        )
    }
}

impl fmt::Display for SwitchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rx={} fwd={} drop={} bpdu_rx={} bpdu_tx={}",
            self.frames_received,
            self.frames_forwarded,
            self.frames_dropped,
            self.bpdus_received,
            self.bpdus_sent
        )
    }
}
