//! Packet types

use bytes::Bytes;
use std::time::SystemTime;

use crate::PortId;

/// A frame received from the link transport
#[derive(Debug, Clone)]
pub struct Packet {
    /// When the frame was received
    pub timestamp: SystemTime,
    /// Port the frame was received on
    pub port: PortId,
    /// Frame data (including all headers)
    pub data: Bytes,
}

impl Packet {
    /// Create a new packet
    pub fn new(port: PortId, data: impl Into<Bytes>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            port,
            data: data.into(),
        }
    }

    /// Get packet data as slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get packet length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if packet is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
