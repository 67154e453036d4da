//! Link transport interface
//!
//! The switch core never touches sockets directly. Everything it needs from
//! the outside world (receiving frames, sending frames, the switch MAC and
//! the port names) goes through [`LinkTransport`].

use async_trait::async_trait;

use crate::{MacAddr, Packet, PortId, Result};

/// Frame transport shared by all switch ports
#[async_trait]
pub trait LinkTransport: Send {
    /// Wait for the next frame on any port.
    ///
    /// Returns `None` once the transport is closed.
    async fn receive(&mut self) -> Option<Packet>;

    /// Send a frame out of `port`. Best effort, never blocks on the wire.
    fn send(&self, port: PortId, frame: &[u8]) -> Result<()>;

    /// Hardware address of the switch
    fn own_mac(&self) -> MacAddr;

    /// Human-readable name of `port`
    fn port_name(&self, port: PortId) -> Option<&str>;

    /// Number of ports, numbered `0..port_count()`
    fn port_count(&self) -> usize;

    /// Names of all ports in index order
    fn port_names(&self) -> Vec<String> {
        (0..self.port_count())
            .filter_map(|port| self.port_name(port).map(str::to_string))
            .collect()
    }
}
