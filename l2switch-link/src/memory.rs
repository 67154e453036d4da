//! In-memory transport
//!
//! [`MemoryLink::new`] returns the transport together with the two ends a
//! test holds on to: an [`Injector`] that delivers frames to the switch as
//! if they arrived on a port, and a [`Tap`] that yields every frame the
//! switch sends. Dropping every `Injector` closes the transport.

use async_trait::async_trait;
use bytes::Bytes;
use l2switch_core::{Error, LinkTransport, MacAddr, Packet, PortId, Result};
use tokio::sync::mpsc;

use crate::stats::LinkCounters;

/// Transport backed by channels instead of interfaces
pub struct MemoryLink {
    names: Vec<String>,
    mac: MacAddr,
    inbound: mpsc::UnboundedReceiver<Packet>,
    outbound: mpsc::UnboundedSender<(PortId, Bytes)>,
    counters: LinkCounters,
}

/// Delivers frames into a [`MemoryLink`]
#[derive(Debug, Clone)]
pub struct Injector {
    tx: mpsc::UnboundedSender<Packet>,
    ports: usize,
}

/// Receives frames sent through a [`MemoryLink`]
#[derive(Debug)]
pub struct Tap {
    rx: mpsc::UnboundedReceiver<(PortId, Bytes)>,
}

impl MemoryLink {
    pub fn new<I, S>(mac: MacAddr, names: I) -> (Self, Injector, Tap)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let injector = Injector {
            tx: in_tx,
            ports: names.len(),
        };

        let link = Self {
            names,
            mac,
            inbound: in_rx,
            outbound: out_tx,
            counters: LinkCounters::new(),
        };

        (link, injector, Tap { rx: out_rx })
    }

    pub fn counters(&self) -> LinkCounters {
        self.counters.clone()
    }
}

#[async_trait]
impl LinkTransport for MemoryLink {
    async fn receive(&mut self) -> Option<Packet> {
        let packet = self.inbound.recv().await?;
        self.counters.record_received(packet.len());
        Some(packet)
    }

    fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        if port >= self.names.len() {
            self.counters.record_send_error();
            return Err(Error::link(format!("No such port {}", port)));
        }

        match self.outbound.send((port, Bytes::copy_from_slice(frame))) {
            Ok(()) => {
                self.counters.record_sent(frame.len());
                Ok(())
            }
            Err(_) => {
                self.counters.record_send_error();
                Err(Error::link("Tap closed"))
            }
        }
    }

    fn own_mac(&self) -> MacAddr {
        self.mac
    }

    fn port_name(&self, port: PortId) -> Option<&str> {
        self.names.get(port).map(String::as_str)
    }

    fn port_count(&self) -> usize {
        self.names.len()
    }
}

impl Injector {
    /// Deliver `frame` as if it was received on `port`
    pub fn inject(&self, port: PortId, frame: impl Into<Bytes>) -> Result<()> {
        if port >= self.ports {
            return Err(Error::link(format!("No such port {}", port)));
        }

        self.tx
            .send(Packet::new(port, frame))
            .map_err(|_| Error::link("Link closed"))
    }
}

impl Tap {
    /// Wait for the next sent frame; `None` once the link is dropped
    pub async fn recv(&mut self) -> Option<(PortId, Bytes)> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<(PortId, Bytes)> {
        self.rx.try_recv().ok()
    }

    /// Everything sent so far
    pub fn drain(&mut self) -> Vec<(PortId, Bytes)> {
        let mut frames = Vec::new();
        while let Some(frame) = self.try_recv() {
            frames.push(frame);
        }
        frames
    }
}
