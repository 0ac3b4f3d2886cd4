//! Static host registry.
//!
//! The registry is compiled-in configuration: an ordered list of hosts, each
//! with the Discord channel its results are mirrored to. Order matters, it
//! drives both the probe order of a sweep and the delivery order of a
//! notification.

use std::fmt;

use tokio::sync::RwLock;

use crate::chat::ChannelHandle;

/// Stable tag identifying a registered host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostId {
    Google,
    Jeedom,
}

impl HostId {
    /// Every tag, in declaration order.
    pub const ALL: [HostId; 2] = [HostId::Google, HostId::Jeedom];

    pub(crate) fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostId::Google => write!(f, "Google"),
            HostId::Jeedom => write!(f, "Jeedom"),
        }
    }
}

/// Where notifications for a host are delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetSlot {
    /// No ready event has been handled yet.
    #[default]
    Unresolved,
    Resolved(ChannelHandle),
    /// The last ready event could not resolve the channel id.
    Failed,
}

impl TargetSlot {
    pub fn handle(&self) -> Option<&ChannelHandle> {
        match self {
            TargetSlot::Resolved(handle) => Some(handle),
            TargetSlot::Unresolved | TargetSlot::Failed => None,
        }
    }
}

#[derive(Debug)]
pub struct HostEntry {
    pub id: HostId,
    pub name: String,
    pub address: String,
    pub notify_target_id: u64,
    target: RwLock<TargetSlot>,
}

impl HostEntry {
    pub fn new(
        id: HostId,
        name: impl Into<String>,
        address: impl Into<String>,
        notify_target_id: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            notify_target_id,
            target: RwLock::new(TargetSlot::Unresolved),
        }
    }

    /// Snapshot of the current notification slot.
    pub async fn target(&self) -> TargetSlot {
        self.target.read().await.clone()
    }

    pub async fn set_target(&self, slot: TargetSlot) {
        *self.target.write().await = slot;
    }
}

/// Ordered collection of hosts keyed by [`HostId`].
#[derive(Debug)]
pub struct Registry {
    entries: Vec<HostEntry>,
}

impl Registry {
    pub fn new(entries: Vec<HostEntry>) -> Self {
        Self { entries }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HostEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: HostId) -> Option<&HostEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(vec![
            HostEntry::new(HostId::Google, "Google", "google.com", 1469384230160171018),
            HostEntry::new(HostId::Jeedom, "Jeedom", "192.168.1.53", 1469389859599941825),
        ])
    }
}
