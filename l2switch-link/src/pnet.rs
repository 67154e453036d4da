//! Raw Ethernet transport over `pnet_datalink`

use async_trait::async_trait;
use bytes::Bytes;
use l2switch_core::{Error, LinkTransport, MacAddr, Packet, PortId, Result};
use parking_lot::Mutex;
use pnet_datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender};
use std::io::ErrorKind;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::interface::{find_interface, InterfaceInfo};
use crate::stats::LinkCounters;

/// How long a reader thread blocks before checking whether the link is gone
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// One raw channel per interface, all feeding a single receive queue
pub struct PnetLink {
    interfaces: Vec<InterfaceInfo>,
    senders: Vec<Mutex<Box<dyn DataLinkSender>>>,
    rx: mpsc::UnboundedReceiver<Packet>,
    counters: LinkCounters,
    mac: MacAddr,
}

impl PnetLink {
    /// Open every named interface. Port `i` is `names[i]`; the switch MAC
    /// is the MAC of the first interface.
    pub fn open<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Interface("No interfaces given".to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let counters = LinkCounters::new();
        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            ..Default::default()
        };

        let mut interfaces = Vec::with_capacity(names.len());
        let mut senders = Vec::with_capacity(names.len());

        for (port, name) in names.iter().enumerate() {
            let iface = find_interface(name.as_ref())?;
            let info = InterfaceInfo::from(&iface);

            let (sender, receiver) = match pnet_datalink::channel(&iface, config) {
                Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
                Ok(_) => return Err(Error::Interface("Unsupported channel type".to_string())),
                Err(e) => {
                    return Err(Error::Interface(format!(
                        "Failed to create channel on {}: {}",
                        info.name, e
                    )));
                }
            };

            spawn_reader(
                port,
                info.name.clone(),
                receiver,
                tx.clone(),
                counters.clone(),
            )?;
            debug!(port, interface = %info, "Opened link");

            interfaces.push(info);
            senders.push(Mutex::new(sender));
        }

        let mac = interfaces[0].mac;
        info!(ports = interfaces.len(), mac = %mac, "Link transport ready");

        Ok(Self {
            interfaces,
            senders,
            rx,
            counters,
            mac,
        })
    }

    pub fn interfaces(&self) -> &[InterfaceInfo] {
        &self.interfaces
    }

    /// Shared counters, usable after the transport is moved away
    pub fn counters(&self) -> LinkCounters {
        self.counters.clone()
    }
}

fn spawn_reader(
    port: PortId,
    name: String,
    mut receiver: Box<dyn DataLinkReceiver>,
    tx: mpsc::UnboundedSender<Packet>,
    counters: LinkCounters,
) -> Result<()> {
    thread::Builder::new()
        .name(format!("link-{}", name))
        .spawn(move || {
            loop {
                match receiver.next() {
                    Ok(frame) => {
                        counters.record_received(frame.len());
                        let packet = Packet::new(port, Bytes::copy_from_slice(frame));
                        if tx.send(packet).is_err() {
                            break;
                        }
                    }
                    Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                        if tx.is_closed() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(port, interface = %name, error = %e, "Receive failed");
                        break;
                    }
                }
            }
            debug!(port, interface = %name, "Reader thread finished");
        })?;

    Ok(())
}

#[async_trait]
impl LinkTransport for PnetLink {
    async fn receive(&mut self) -> Option<Packet> {
        self.rx.recv().await
    }

    fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        let sender = self
            .senders
            .get(port)
            .ok_or_else(|| Error::link(format!("No such port {}", port)))?;

        let result = sender
            .lock()
            .send_to(frame, None)
            .ok_or_else(|| Error::Interface("Failed to send packet".to_string()))
            .and_then(|sent| sent.map_err(Error::from));

        match result {
            Ok(()) => {
                self.counters.record_sent(frame.len());
                Ok(())
            }
            Err(e) => {
                self.counters.record_send_error();
                Err(e)
            }
        }
    }

    fn own_mac(&self) -> MacAddr {
        self.mac
    }

    fn port_name(&self, port: PortId) -> Option<&str> {
        self.interfaces.get(port).map(|iface| iface.name.as_str())
    }

    fn port_count(&self) -> usize {
        self.interfaces.len()
    }
}
