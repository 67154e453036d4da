//! Link transports for l2switch
//!
//! This crate provides the concrete [`LinkTransport`] implementations the
//! switch runs on.
//!
//! ## Transports
//!
//! - [`PnetLink`] - raw Ethernet channels on real interfaces through
//!   `pnet_datalink`. One blocking reader thread per interface feeds a single
//!   async queue, so the switch sees one stream of frames tagged with their
//!   port index.
//! - [`MemoryLink`] - in-process transport for tests and simulations. Frames
//!   are injected through an [`Injector`] and everything the switch sends
//!   comes out of a [`Tap`].
//!
//! Both keep [`LinkCounters`] that can be cloned and read from anywhere.
//!
//! ## Example
//!
//! ```no_run
//! use l2switch_core::LinkTransport;
//! use l2switch_link::PnetLink;
//!
//! # async fn run() -> l2switch_core::Result<()> {
//! let mut link = PnetLink::open(&["r-0", "rr-0-1"])?;
//! println!("switch MAC {}", link.own_mac());
//!
//! while let Some(packet) = link.receive().await {
//!     println!("{} bytes on {:?}", packet.len(), link.port_name(packet.port));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`LinkTransport`]: l2switch_core::LinkTransport

pub mod interface;
pub mod memory;
pub mod pnet;
pub mod stats;

pub use interface::{find_interface, InterfaceInfo};
pub use memory::{Injector, MemoryLink, Tap};
pub use pnet::PnetLink;
pub use stats::{LinkCounters, LinkStats};
