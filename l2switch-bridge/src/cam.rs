//! MAC learning table

use l2switch_core::{MacAddr, PortId};
use std::collections::HashMap;

/// Maps source addresses to the port they were last seen on.
///
/// Entries never age out; the most recent observation wins.
#[derive(Debug, Clone, Default)]
pub struct MacTable {
    entries: HashMap<MacAddr, PortId>,
}

impl MacTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `mac` was seen on `port`, returning the previous port if any
    pub fn learn(&mut self, mac: MacAddr, port: PortId) -> Option<PortId> {
        self.entries.insert(mac, port)
    }

    /// Port `mac` was last seen on
    pub fn lookup(&self, mac: &MacAddr) -> Option<PortId> {
        self.entries.get(mac).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MacAddr, &PortId)> {
        self.entries.iter()
    }
}
