//! Network interface lookup

use l2switch_core::{Error, MacAddr, Result};
use pnet_datalink::{self, NetworkInterface};
use std::fmt;

/// Information about an interface the switch is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "r-0", "eth0")
    pub name: String,
    /// Kernel interface index
    pub index: u32,
    /// MAC address, all zeros when the interface has none
    pub mac: MacAddr,
    /// Whether the interface is up
    pub is_up: bool,
}

impl From<&NetworkInterface> for InterfaceInfo {
    fn from(iface: &NetworkInterface) -> Self {
        let mac = iface
            .mac
            .map(|mac| MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]))
            .unwrap_or(MacAddr::ZERO);

        InterfaceInfo {
            name: iface.name.clone(),
            index: iface.index,
            mac,
            is_up: iface.is_up(),
        }
    }
}

impl fmt::Display for InterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.mac)
    }
}

/// Look up an interface by name
pub fn find_interface(name: &str) -> Result<NetworkInterface> {
    pnet_datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}
