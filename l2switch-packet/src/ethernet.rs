//! Ethernet header parsing
//!
//! Only the fields the switch needs are decoded: both addresses, the
//! ethertype and, when the tag marker is present, the VLAN id.

use bytes::Buf;
use l2switch_core::{Error, MacAddr, Result, VlanId};

use crate::vlan::{TAG_MARKER, VLAN_ID_MASK, VLAN_TAG_SIZE};

/// Destination + source MAC
pub const ADDRESS_SIZE: usize = 12;

/// Ethernet header size (dst + src + type/length)
pub const HEADER_SIZE: usize = 14;

/// Decoded Ethernet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    /// Destination MAC address
    pub destination: MacAddr,
    /// Source MAC address
    pub source: MacAddr,
    /// EtherType (after the VLAN tag, if one is present)
    pub ethertype: u16,
    /// VLAN id carried in the tag, `None` for untagged frames
    pub vlan_id: Option<VlanId>,
}

impl EthernetHeader {
    /// Parse the header at the start of `data`.
    ///
    /// Reads the 16-bit field at offset 12. When it equals [`TAG_MARKER`] the
    /// next 16 bits are the tag control field (low 12 bits = VLAN id) and the
    /// real ethertype follows 4 bytes further in.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::parsing(format!(
                "Ethernet frame too short: {} bytes (need {})",
                data.len(),
                HEADER_SIZE
            )));
        }

        let mut buf = data;
        let mut destination = [0u8; 6];
        buf.copy_to_slice(&mut destination);
        let mut source = [0u8; 6];
        buf.copy_to_slice(&mut source);

        let mut ethertype = buf.get_u16();
        let mut vlan_id = None;

        if ethertype == TAG_MARKER {
            if buf.remaining() < VLAN_TAG_SIZE {
                return Err(Error::parsing(format!(
                    "Tagged frame too short: {} bytes (need {})",
                    data.len(),
                    HEADER_SIZE + VLAN_TAG_SIZE
                )));
            }
            let tci = buf.get_u16();
            vlan_id = Some(tci & VLAN_ID_MASK);
            ethertype = buf.get_u16();
        }

        Ok(Self {
            destination: MacAddr(destination),
            source: MacAddr(source),
            ethertype,
            vlan_id,
        })
    }

    /// Whether the frame carries a VLAN tag
    pub fn is_tagged(&self) -> bool {
        self.vlan_id.is_some()
    }

    /// Whether the frame is addressed to the bridge group address
    pub fn is_bpdu(&self) -> bool {
        self.destination.is_stp_multicast()
    }

    /// Number of header bytes, including the tag when present
    pub fn header_len(&self) -> usize {
        if self.is_tagged() {
            HEADER_SIZE + VLAN_TAG_SIZE
        } else {
            HEADER_SIZE
        }
    }
}

/// A decoded frame borrowing the raw bytes it came from
#[derive(Debug, Clone, Copy)]
pub struct EthernetFrame<'a> {
    /// Decoded header fields
    pub header: EthernetHeader,
    /// Bytes after the header (and tag)
    pub payload: &'a [u8],
    /// Total frame length
    pub len: usize,
    raw: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    /// Decode a frame
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = EthernetHeader::parse(data)?;
        Ok(Self {
            header,
            payload: &data[header.header_len()..],
            len: data.len(),
            raw: data,
        })
    }

    /// The complete frame as received
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DST: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
    const SRC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

    fn untagged() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&[0x08, 0x00]); // IPv4
        data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        data
    }

    #[test]
    fn test_parse_untagged() {
        let data = untagged();
        let header = EthernetHeader::parse(&data).unwrap();

        assert_eq!(header.destination, MacAddr(DST));
        assert_eq!(header.source, MacAddr(SRC));
        assert_eq!(header.ethertype, 0x0800);
        assert_eq!(header.vlan_id, None);
        assert_eq!(header.header_len(), HEADER_SIZE);
        assert!(!header.is_bpdu());
    }

    #[test]
    fn test_parse_tagged() {
        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&[0x82, 0x00, 0x00, 0x64]); // marker + VLAN 100
        data.extend_from_slice(&[0x08, 0x06]); // ARP
        data.extend_from_slice(&[0xFF; 4]);

        let frame = EthernetFrame::parse(&data).unwrap();
        assert_eq!(frame.header.vlan_id, Some(100));
        assert_eq!(frame.header.ethertype, 0x0806);
        assert_eq!(frame.payload, &[0xFF; 4]);
        assert_eq!(frame.len, data.len());
    }

    #[test]
    fn test_tci_upper_bits_ignored() {
        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&[0x82, 0x00, 0xA0, 0x0A]); // PCP bits set, VLAN 10
        data.extend_from_slice(&[0x08, 0x00]);

        let header = EthernetHeader::parse(&data).unwrap();
        assert_eq!(header.vlan_id, Some(10));
    }

    #[test]
    fn test_ieee_tpid_is_not_a_tag() {
        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&[0x81, 0x00, 0x00, 0x64]);
        data.extend_from_slice(&[0x08, 0x00]);

        let header = EthernetHeader::parse(&data).unwrap();
        assert_eq!(header.vlan_id, None);
        assert_eq!(header.ethertype, 0x8100);
    }

    #[test]
    fn test_parse_too_short() {
        assert!(EthernetHeader::parse(&[0u8; 13]).is_err());

        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&[0x82, 0x00, 0x00]);
        assert!(EthernetHeader::parse(&data).is_err());
    }

    #[test]
    fn test_bpdu_destination() {
        let mut data = untagged();
        data[0..6].copy_from_slice(&MacAddr::STP_MULTICAST.0);
        let header = EthernetHeader::parse(&data).unwrap();
        assert!(header.is_bpdu());
    }
}
