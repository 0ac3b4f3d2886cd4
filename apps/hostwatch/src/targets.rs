use std::fmt;

use crate::registry::HostId;

/// Set of hosts a log message is addressed to.
///
/// Only membership and union are meaningful; the empty set means the message
/// stays on the local console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetSet {
    bits: u8,
}

impl TargetSet {
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        HostId::ALL.into_iter().collect()
    }

    pub fn only(id: HostId) -> Self {
        Self { bits: id.bit() }
    }

    pub fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }

    pub fn contains(&self, id: HostId) -> bool {
        self.bits & id.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = HostId> + '_ {
        HostId::ALL.into_iter().filter(|id| self.contains(*id))
    }
}

impl From<HostId> for TargetSet {
    fn from(id: HostId) -> Self {
        Self::only(id)
    }
}

impl FromIterator<HostId> for TargetSet {
    fn from_iter<I: IntoIterator<Item = HostId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), |set, id| set.union(Self::only(id)))
    }
}

impl fmt::Display for TargetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        if *self == Self::all() {
            return write!(f, "All");
        }
        let names: Vec<String> = self.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}
