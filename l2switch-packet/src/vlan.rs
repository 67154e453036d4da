//! VLAN tag structures
//!
//! A tag is 4 bytes inserted directly after the 12 address bytes:
//!
//! ```text
//! | Dst MAC (6) | Src MAC (6) | Marker 0x8200 (2) | TCI (2) | EtherType (2) | Payload ...
//! ```
//!
//! The TCI carries the VLAN id in its low 12 bits; the upper 4 bits are
//! always written as zero.

use bytes::{BufMut, Bytes, BytesMut};
use l2switch_core::{Error, Result, VlanId};
use std::fmt;

use crate::ethernet::ADDRESS_SIZE;

/// Tag marker written in place of the ethertype on tagged frames
pub const TAG_MARKER: u16 = 0x8200;

/// Size of the VLAN tag in bytes (2 marker + 2 TCI)
pub const VLAN_TAG_SIZE: usize = 4;

/// VLAN ID mask (12 bits)
pub(crate) const VLAN_ID_MASK: u16 = 0x0FFF;

/// VLAN tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanTag {
    /// VLAN identifier (only the low 12 bits are encoded)
    pub vlan_id: VlanId,
}

impl VlanTag {
    pub fn new(vlan_id: VlanId) -> Self {
        Self { vlan_id }
    }

    /// Parse a tag from its 4 wire bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < VLAN_TAG_SIZE {
            return Err(Error::parsing(format!(
                "VLAN tag too short: {} bytes, expected {}",
                data.len(),
                VLAN_TAG_SIZE
            )));
        }

        let marker = u16::from_be_bytes([data[0], data[1]]);
        if marker != TAG_MARKER {
            return Err(Error::parsing(format!(
                "Invalid tag marker: 0x{:04X}, expected 0x{:04X}",
                marker, TAG_MARKER
            )));
        }

        let tci = u16::from_be_bytes([data[2], data[3]]);
        Ok(Self {
            vlan_id: tci & VLAN_ID_MASK,
        })
    }

    /// Tag control field as written on the wire
    pub fn tci(&self) -> u16 {
        self.vlan_id & VLAN_ID_MASK
    }

    /// Build the 4 tag bytes
    pub fn build(&self) -> [u8; VLAN_TAG_SIZE] {
        let mut bytes = [0u8; VLAN_TAG_SIZE];
        bytes[0..2].copy_from_slice(&TAG_MARKER.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.tci().to_be_bytes());
        bytes
    }
}

impl fmt::Display for VlanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VLAN {}", self.vlan_id)
    }
}

/// Encode the 4-byte tag for `vlan_id`
pub fn encode_vlan_tag(vlan_id: VlanId) -> [u8; VLAN_TAG_SIZE] {
    VlanTag::new(vlan_id).build()
}

/// Return a copy of `frame` with a tag for `vlan_id` inserted after the addresses
pub fn push_tag(frame: &[u8], vlan_id: VlanId) -> Result<Bytes> {
    if frame.len() < ADDRESS_SIZE {
        return Err(Error::parsing(format!("Cannot tag frame of {} bytes", frame.len())));
    }

    let mut buf = BytesMut::with_capacity(frame.len() + VLAN_TAG_SIZE);
    buf.put_slice(&frame[..ADDRESS_SIZE]);
    buf.put_slice(&encode_vlan_tag(vlan_id));
    buf.put_slice(&frame[ADDRESS_SIZE..]);
    Ok(buf.freeze())
}

/// Return a copy of `frame` with the 4 tag bytes after the addresses removed
pub fn strip_tag(frame: &[u8]) -> Result<Bytes> {
    if frame.len() < ADDRESS_SIZE + VLAN_TAG_SIZE {
        return Err(Error::parsing(format!("Cannot untag frame of {} bytes", frame.len())));
    }

    let mut buf = BytesMut::with_capacity(frame.len() - VLAN_TAG_SIZE);
    buf.put_slice(&frame[..ADDRESS_SIZE]);
    buf.put_slice(&frame[ADDRESS_SIZE + VLAN_TAG_SIZE..]);
    Ok(buf.freeze())
}
