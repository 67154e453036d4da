//! l2switch core library
//!
//! This crate provides the shared types, error handling and the link
//! transport interface used by every other l2switch crate.

pub mod error;
pub mod link;
pub mod packet;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use link::LinkTransport;
pub use packet::Packet;
pub use types::*;
