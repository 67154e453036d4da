//! Per-switch configuration file
//!
//! ```text
//! 14
//! r-0 1
//! r-1 2
//! rr-0-1 T
//! ```
//!
//! The first non-empty line is the bridge priority, used as the bridge id.
//! Every following line maps an interface name to `T` (trunk) or the VLAN
//! id of an access port.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use l2switch_core::{BridgeId, Error, Result};
use tracing::debug;

use crate::port::{PortTable, VlanMode};

/// Parsed configuration of one switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchConfig {
    /// Bridge priority, also the bridge id
    pub priority: BridgeId,
    /// Interface name to VLAN mode
    pub vlans: BTreeMap<String, VlanMode>,
}

impl SwitchConfig {
    /// Conventional location of the config of switch `id` inside `dir`
    pub fn path_for(dir: impl AsRef<Path>, id: &str) -> PathBuf {
        dir.as_ref().join(format!("switch{}.cfg", id))
    }

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            let reason = format!("{}: {}", path.display(), e);
            Error::Io(std::io::Error::new(e.kind(), reason))
        })?;
        text.parse()
    }

    pub fn vlan_of(&self, name: &str) -> Option<VlanMode> {
        self.vlans.get(name).copied()
    }

    /// Build the port table for the interfaces the transport opened, in
    /// port index order. Every interface needs a VLAN entry.
    pub fn resolve_ports<S: AsRef<str>>(&self, interfaces: &[S]) -> Result<PortTable> {
        let mut ports = Vec::with_capacity(interfaces.len());
        for name in interfaces {
            let name = name.as_ref();
            let mode = self
                .vlan_of(name)
                .ok_or_else(|| Error::UnknownPort(name.to_string()))?;
            ports.push((name.to_string(), mode));
        }

        for name in self.vlans.keys() {
            if !interfaces.iter().any(|i| i.as_ref() == name) {
                debug!(name = %name, "Configured interface not attached, ignoring");
            }
        }

        Ok(PortTable::new(ports))
    }
}

impl FromStr for SwitchConfig {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, first) = lines
            .next()
            .ok_or_else(|| Error::config(1, "missing bridge priority"))?;
        let priority = first
            .parse::<BridgeId>()
            .map_err(|e| Error::config(line_no, format!("invalid priority '{first}': {e}")))?;

        let mut vlans = BTreeMap::new();
        for (line_no, line) in lines {
            let mut fields = line.split_whitespace();
            let (Some(name), Some(vlan), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::config(
                    line_no,
                    format!("expected '<interface> <vlan>', got '{}'", line),
                ));
            };

            let mode = vlan
                .parse::<VlanMode>()
                .map_err(|_| Error::config(line_no, format!("invalid VLAN '{vlan}' for {name}")))?;
            vlans.insert(name.to_string(), mode);
        }

        Ok(Self { priority, vlans })
    }
}
