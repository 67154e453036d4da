//! Dispatch loop
//!
//! A single task owns the [`Switch`] and multiplexes two event sources onto
//! it: frames coming from the link and the periodic hello tick. Each event
//! runs to completion before the next one is looked at, so frame handling
//! and BPDU origination never interleave.

use std::future::{self, Future};
use std::time::Duration;

use l2switch_core::{LinkTransport, Packet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::forwarding::Egress;
use crate::switch::Switch;

/// Hello interval used unless configured otherwise
pub const DEFAULT_HELLO_INTERVAL: Duration = Duration::from_secs(1);

/// Drives a [`Switch`] from a [`LinkTransport`]
pub struct Dispatcher<L> {
    link: L,
    switch: Switch,
    hello_interval: Duration,
}

impl<L: LinkTransport> Dispatcher<L> {
    pub fn new(link: L, switch: Switch) -> Self {
        Self {
            link,
            switch,
            hello_interval: DEFAULT_HELLO_INTERVAL,
        }
    }

    pub fn with_hello_interval(mut self, interval: Duration) -> Self {
        self.hello_interval = interval;
        self
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Run until the link closes, returning the final switch state.
    pub async fn run(self) -> Switch {
        self.run_until(future::pending::<()>()).await
    }

    /// Run until the link closes or `shutdown` completes.
    ///
    /// The first hello goes out as soon as the loop starts.
    pub async fn run_until<F>(mut self, shutdown: F) -> Switch
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.hello_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            ports = self.link.port_count(),
            hello_ms = self.hello_interval.as_millis() as u64,
            "Dispatcher started"
        );
        debug!(ports = ?self.link.port_names(), "Link ports");

        loop {
            tokio::select! {
                packet = self.link.receive() => match packet {
                    Some(packet) => self.on_packet(packet),
                    None => {
                        info!("Link closed");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    let egress = self.switch.on_tick();
                    self.transmit(egress);
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        debug!(stats = %self.switch.stats(), "Dispatcher stopped");
        self.switch
    }

    fn on_packet(&mut self, packet: Packet) {
        match self.switch.handle_frame(packet.port, packet.data()) {
            Ok(egress) => self.transmit(egress),
            Err(e) => warn!(
                port = packet.port,
                len = packet.len(),
                error = %e,
                "Dropping frame"
            ),
        }
    }

    fn transmit(&mut self, egress: Vec<Egress>) {
        for Egress { port, frame } in egress {
            if let Err(e) = self.link.send(port, &frame) {
                self.switch.record_send_error(port, &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortTable, VlanMode};
    use l2switch_core::MacAddr;
    use l2switch_link::MemoryLink;
    use l2switch_packet::{decode_bpdu, Bpdu, EthernetHeader};
    use tokio::sync::oneshot;

    const OWN_MAC: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x10]);
    const HOST_A: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x0A]);
    const LONG: Duration = Duration::from_secs(3600);

    const NAMES: [&str; 3] = ["r-0", "r-1", "rr-0-1"];

    fn switch() -> Switch {
        let ports = PortTable::new([
            (NAMES[0], VlanMode::Access(1)),
            (NAMES[1], VlanMode::Access(1)),
            (NAMES[2], VlanMode::Trunk),
        ]);
        Switch::new(10, OWN_MAC, ports)
    }

    fn broadcast_from(src: MacAddr) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(MacAddr::BROADCAST.as_bytes());
        data.extend_from_slice(src.as_bytes());
        data.extend_from_slice(&[0x08, 0x06, 0x00, 0x01, 0x08, 0x00]);
        data
    }

    fn is_bpdu(frame: &[u8]) -> bool {
        EthernetHeader::parse(frame)
            .map(|h| h.is_bpdu())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_forwards_until_link_closes() {
        let (link, injector, mut tap) = MemoryLink::new(OWN_MAC, NAMES);
        let dispatcher = Dispatcher::new(link, switch()).with_hello_interval(LONG);

        injector.inject(0, broadcast_from(HOST_A)).unwrap();
        drop(injector);

        let switch = dispatcher.run().await;

        let data: Vec<_> = tap
            .drain()
            .into_iter()
            .filter(|(_, frame)| !is_bpdu(frame))
            .collect();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].0, 1);
        assert_eq!(&data[0].1[..], &broadcast_from(HOST_A)[..]);
        assert_eq!(data[1].0, 2);
        assert_eq!(EthernetHeader::parse(&data[1].1).unwrap().vlan_id, Some(1));

        assert_eq!(switch.mac_table().lookup(&HOST_A), Some(0));
        assert_eq!(switch.stats().frames_received, 1);
    }

    #[tokio::test]
    async fn test_hello_on_start() {
        let (link, injector, mut tap) = MemoryLink::new(OWN_MAC, NAMES);
        let dispatcher = Dispatcher::new(link, switch()).with_hello_interval(LONG);
        let handle = tokio::spawn(dispatcher.run());

        let (port, frame) = tap.recv().await.unwrap();
        assert_eq!(port, 2);
        assert!(is_bpdu(&frame));
        assert_eq!(decode_bpdu(&frame).unwrap(), Bpdu::new(10, 0, 10));

        drop(injector);
        let switch = handle.await.unwrap();
        assert_eq!(switch.stats().bpdus_sent, 1);
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_stop_loop() {
        let (link, injector, _tap) = MemoryLink::new(OWN_MAC, NAMES);
        let dispatcher = Dispatcher::new(link, switch()).with_hello_interval(LONG);

        injector.inject(0, vec![0u8; 5]).unwrap();
        injector.inject(1, broadcast_from(HOST_A)).unwrap();
        drop(injector);

        let switch = dispatcher.run().await;
        assert_eq!(switch.stats().malformed, 1);
        assert_eq!(switch.stats().frames_received, 1);
        assert_eq!(switch.mac_table().lookup(&HOST_A), Some(1));
    }

    #[tokio::test]
    async fn test_send_errors_counted() {
        let (link, injector, tap) = MemoryLink::new(OWN_MAC, NAMES);
        let dispatcher = Dispatcher::new(link, switch()).with_hello_interval(LONG);
        drop(tap);

        injector.inject(0, broadcast_from(HOST_A)).unwrap();
        drop(injector);

        let switch = dispatcher.run().await;
        assert_eq!(switch.stats().frames_forwarded, 2);
        assert!(switch.stats().send_errors >= 2);
    }

    #[tokio::test]
    async fn test_shutdown() {
        let (link, _injector, _tap) = MemoryLink::new(OWN_MAC, NAMES);
        let dispatcher = Dispatcher::new(link, switch()).with_hello_interval(LONG);
        assert_eq!(dispatcher.link().port_count(), 3);
        assert!(dispatcher.switch().bridge().is_root());

        let (tx, rx) = oneshot::channel::<()>();
        tx.send(()).unwrap();

        let shutdown = async {
            let _ = rx.await;
        };
        let switch = dispatcher.run_until(shutdown).await;
        assert!(switch.bridge().is_root());
    }
}
