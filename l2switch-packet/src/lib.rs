//! Frame codec for l2switch
//!
//! This crate turns raw link-layer bytes into the handful of fields the
//! switch cares about, and builds the two kinds of frames the switch
//! originates or rewrites:
//!
//! - **Ethernet headers** with an optional VLAN tag (see [`ethernet`])
//! - **VLAN tags** inserted after / stripped from the address bytes (see [`vlan`])
//! - **BPDU frames** of the reduced spanning tree protocol (see [`bpdu`])
//!
//! # Tag marker
//!
//! Tagged frames carry [`vlan::TAG_MARKER`] (`0x8200`) in place of the
//! ethertype, not the IEEE 802.1Q TPID. Only frames produced by this codec
//! are expected on trunk links, so the marker just has to agree between
//! encoder and decoder.
//!
//! # Example
//!
//! ```rust
//! use l2switch_packet::{ethernet::EthernetHeader, vlan};
//!
//! let untagged = [
//!     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst
//!     0x02, 0x00, 0x00, 0x00, 0x00, 0x01, // src
//!     0x08, 0x00, // IPv4
//!     0xde, 0xad, // payload
//! ];
//!
//! let tagged = vlan::push_tag(&untagged, 10).unwrap();
//! let header = EthernetHeader::parse(&tagged).unwrap();
//! assert_eq!(header.vlan_id, Some(10));
//! assert_eq!(header.ethertype, 0x0800);
//! assert_eq!(&vlan::strip_tag(&tagged).unwrap()[..], &untagged[..]);
//! ```

pub mod bpdu;
pub mod ethernet;
pub mod vlan;

pub use bpdu::{decode_bpdu, encode_bpdu, Bpdu, BPDU_FRAME_SIZE};
pub use ethernet::{EthernetFrame, EthernetHeader};
pub use vlan::{encode_vlan_tag, push_tag, strip_tag, VlanTag, TAG_MARKER, VLAN_TAG_SIZE};
