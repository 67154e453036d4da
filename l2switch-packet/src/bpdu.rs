//! BPDU frame structures and parsing
//!
//! The reduced spanning tree protocol only exchanges three values: the root
//! the sender believes in, its cost to that root, and its own bridge id.
//! They travel in a fixed 52-byte 802.3 frame:
//!
//! ```text
//! offset  size  field
//!      0     6  destination (01:80:c2:00:00:00)
//!      6     6  source (sender MAC)
//!     12     2  length (52)
//!     14     3  LLC DSAP 0x42, SSAP 0x42, control 0x03
//!     17     4  BPDU header (zero)
//!     21     1  flags (zero)
//!     22     8  root id
//!     30     4  root path cost
//!     34     8  sender bridge id
//!     42    10  zero padding
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use l2switch_core::{BridgeId, Error, MacAddr, Result};
use std::fmt;

pub use constants::*;

/// BPDU wire constants
pub mod constants {
    /// Total size of a BPDU frame
    pub const BPDU_FRAME_SIZE: usize = 52;

    /// Value written in the 802.3 length field
    pub const BPDU_LLC_LENGTH: u16 = 52;

    /// LLC DSAP and SSAP for STP
    pub const STP_LLC_DSAP: u8 = 0x42;
    pub const STP_LLC_SSAP: u8 = 0x42;
    pub const STP_LLC_CONTROL: u8 = 0x03;

    /// Field offsets from the start of the frame
    pub const ROOT_ID_OFFSET: usize = 22;
    pub const ROOT_PATH_COST_OFFSET: usize = 30;
    pub const BRIDGE_ID_OFFSET: usize = 34;
    pub const BPDU_FIELDS_END: usize = 42;
}

/// Decoded BPDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bpdu {
    /// Root bridge the sender believes in
    pub root_id: BridgeId,
    /// Sender's cost to reach that root
    pub root_path_cost: u32,
    /// Sender's own bridge id
    pub bridge_id: BridgeId,
}

impl Bpdu {
    pub fn new(root_id: BridgeId, root_path_cost: u32, bridge_id: BridgeId) -> Self {
        Self {
            root_id,
            root_path_cost,
            bridge_id,
        }
    }

    /// Parse the BPDU fields out of a complete frame
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < BPDU_FIELDS_END {
            return Err(Error::parsing(format!(
                "BPDU too short: {} bytes (need {})",
                data.len(),
                BPDU_FIELDS_END
            )));
        }

        let mut root_id = [0u8; 8];
        root_id.copy_from_slice(&data[ROOT_ID_OFFSET..ROOT_PATH_COST_OFFSET]);
        let mut cost = [0u8; 4];
        cost.copy_from_slice(&data[ROOT_PATH_COST_OFFSET..BRIDGE_ID_OFFSET]);
        let mut bridge_id = [0u8; 8];
        bridge_id.copy_from_slice(&data[BRIDGE_ID_OFFSET..BPDU_FIELDS_END]);

        Ok(Self {
            root_id: u64::from_be_bytes(root_id),
            root_path_cost: u32::from_be_bytes(cost),
            bridge_id: u64::from_be_bytes(bridge_id),
        })
    }

    /// Build the complete 52-byte frame sent from `sender`
    pub fn build(&self, sender: MacAddr) -> Bytes {
        let mut buf = BytesMut::with_capacity(BPDU_FRAME_SIZE);

        // Ethernet header
        buf.put_slice(MacAddr::STP_MULTICAST.as_bytes());
        buf.put_slice(sender.as_bytes());
        buf.put_u16(BPDU_LLC_LENGTH);

        // LLC header
        buf.put_u8(STP_LLC_DSAP);
        buf.put_u8(STP_LLC_SSAP);
        buf.put_u8(STP_LLC_CONTROL);

        // BPDU header + flags
        buf.put_u32(0);
        buf.put_u8(0);

        buf.put_u64(self.root_id);
        buf.put_u32(self.root_path_cost);
        buf.put_u64(self.bridge_id);

        // Port id, message age, max age, hello time, forward delay
        for _ in 0..5 {
            buf.put_u16(0);
        }

        debug_assert_eq!(buf.len(), BPDU_FRAME_SIZE);
        buf.freeze()
    }
}

impl fmt::Display for Bpdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root={} cost={} bridge={}",
            self.root_id, self.root_path_cost, self.bridge_id
        )
    }
}

/// Encode a BPDU frame
pub fn encode_bpdu(
    root_id: BridgeId,
    root_path_cost: u32,
    bridge_id: BridgeId,
    sender: MacAddr,
) -> Bytes {
    Bpdu::new(root_id, root_path_cost, bridge_id).build(sender)
}

/// Decode the BPDU fields of a frame
pub fn decode_bpdu(data: &[u8]) -> Result<Bpdu> {
    Bpdu::parse(data)
}
