use std::fmt;

use crate::registry::{HostEntry, HostId};

/// User mention prepended to failure reports so a human gets pinged.
pub const FAILURE_MENTION: &str = "<@282197676982927375>";

/// Why a probe did not get an echo reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    TimedOut,
    DestinationHostUnreachable,
    DestinationNetworkUnreachable,
    NameResolutionFailed,
    /// Any other socket level failure, described by the OS or ICMP library.
    Error(String),
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::TimedOut => write!(f, "TimedOut"),
            ProbeStatus::DestinationHostUnreachable => write!(f, "DestinationHostUnreachable"),
            ProbeStatus::DestinationNetworkUnreachable => write!(f, "DestinationNetworkUnreachable"),
            ProbeStatus::NameResolutionFailed => write!(f, "NameResolutionFailed"),
            ProbeStatus::Error(message) => write!(f, "{message}"),
        }
    }
}

/// Outcome of a single echo exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { round_trip_ms: u64 },
    Failure { status: ProbeStatus },
}

impl ProbeOutcome {
    pub fn success(round_trip_ms: u64) -> Self {
        ProbeOutcome::Success { round_trip_ms }
    }

    pub fn failure(status: ProbeStatus) -> Self {
        ProbeOutcome::Failure { status }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

/// Result of probing one registered host during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub host: HostId,
    pub name: String,
    pub address: String,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(entry: &HostEntry, outcome: ProbeOutcome) -> Self {
        Self {
            host: entry.id,
            name: entry.name.clone(),
            address: entry.address.clone(),
            outcome,
        }
    }

    /// Text posted for this result.
    pub fn message(&self) -> String {
        match &self.outcome {
            ProbeOutcome::Success { round_trip_ms } => format!(
                "Ping to {} ({}) successful. Time: {}",
                self.name, self.address, round_trip_ms
            ),
            ProbeOutcome::Failure { status } => format!(
                "{} Ping to {} ({}) failed. Status: {}",
                FAILURE_MENTION, self.name, self.address, status
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jeedom() -> HostEntry {
        HostEntry::new(HostId::Jeedom, "Jeedom", "192.168.1.53", 1)
    }

    #[test]
    fn success_message() {
        let result = ProbeResult::new(&jeedom(), ProbeOutcome::success(3));
        assert_eq!(result.message(), "Ping to Jeedom (192.168.1.53) successful. Time: 3");
    }

    #[test]
    fn failure_message_mentions_user() {
        let result = ProbeResult::new(&jeedom(), ProbeOutcome::failure(ProbeStatus::TimedOut));
        assert_eq!(
            result.message(),
            "<@282197676982927375> Ping to Jeedom (192.168.1.53) failed. Status: TimedOut"
        );
    }

    #[test]
    fn unreachable_statuses_keep_their_names() {
        assert_eq!(ProbeStatus::DestinationHostUnreachable.to_string(), "DestinationHostUnreachable");
        assert_eq!(ProbeStatus::DestinationNetworkUnreachable.to_string(), "DestinationNetworkUnreachable");
    }

    #[test]
    fn error_status_prints_its_text() {
        let status = ProbeStatus::Error("Network is unreachable (os error 101)".into());
        assert_eq!(status.to_string(), "Network is unreachable (os error 101)");
    }
}
