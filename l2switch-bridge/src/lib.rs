//! Switching logic for l2switch
//!
//! This crate holds everything that decides where a frame goes:
//!
//! - [`port`] - port table, VLAN modes and per-trunk spanning tree state
//! - [`cam`] - MAC learning table
//! - [`forwarding`] - VLAN-aware forwarding decision
//! - [`stp`] - reduced spanning tree root election and port states
//! - [`switch`] - the [`Switch`] aggregate owning all mutable state
//! - [`dispatch`] - the single-task loop feeding frames and hello ticks into a [`Switch`]
//! - [`config`] - per-switch configuration file
//! - [`stats`] - frame and BPDU counters
//!
//! ## Concurrency
//!
//! All switch state is owned by one [`Switch`] value. The [`Dispatcher`]
//! multiplexes received frames and the periodic hello tick onto the same
//! task, so frame handling and BPDU origination never run concurrently and
//! no locking is needed.

pub mod cam;
pub mod config;
pub mod dispatch;
pub mod forwarding;
pub mod port;
pub mod stats;
pub mod stp;
pub mod switch;


pub use cam::MacTable;
pub use config::SwitchConfig;
pub use dispatch::{Dispatcher, DEFAULT_HELLO_INTERVAL};
pub use forwarding::{Delivery, Egress, Forwarding, TagAction};
pub use port::{Port, PortState, PortTable, VlanMode};
pub use stats::SwitchStats;
pub use stp::{BpduVerdict, BridgeState, Stp, LINK_COST};
pub use switch::Switch;
