use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use surge_ping::{Client, Config as PingConfig, ICMP, PingIdentifier, PingSequence, SurgeError};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use super::types::{ProbeOutcome, ProbeStatus};

/// Reply timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Echo payload, 32 bytes like the usual platform ping tools send.
const PAYLOAD: &[u8; 32] = b"abcdefghijklmnopqrstuvwabcdefghi";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to open ICMP socket: {0}")]
    Socket(#[from] io::Error),
}

/// Prober trait for reachability checks
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Send a single echo request to `address` and wait for the outcome.
    ///
    /// Never fails: every problem is reported as a failed outcome.
    async fn probe(&self, address: &str) -> ProbeOutcome;
}

/// ICMP echo prober.
///
/// Needs either raw socket privileges or unprivileged ICMP sockets
/// (`net.ipv4.ping_group_range` on Linux).
pub struct IcmpProber {
    v4: Client,
    v6: OnceCell<Client>,
    timeout: Duration,
    sequence: AtomicU16,
}

impl IcmpProber {
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProbeError> {
        Ok(Self {
            v4: Client::new(&PingConfig::default())?,
            v6: OnceCell::new(),
            timeout,
            sequence: AtomicU16::new(0),
        })
    }

    async fn client_for(&self, ip: IpAddr) -> Result<&Client, ProbeError> {
        match ip {
            IpAddr::V4(_) => Ok(&self.v4),
            IpAddr::V6(_) => {
                self.v6
                    .get_or_try_init(|| async {
                        Client::new(&PingConfig::builder().kind(ICMP::V6).build()).map_err(ProbeError::from)
                    })
                    .await
            }
        }
    }
}

/// Resolve a host name or literal address, preferring IPv4.
pub async fn resolve_address(address: &str) -> Option<IpAddr> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Some(ip);
    }

    let addrs: Vec<IpAddr> = tokio::net::lookup_host((address, 0))
        .await
        .ok()?
        .map(|socket| socket.ip())
        .collect();

    addrs.iter().find(|ip| ip.is_ipv4()).or_else(|| addrs.first()).copied()
}

/// Whole milliseconds, saturating instead of truncating.
fn round_trip_ms(rtt: Duration) -> u64 {
    u64::try_from(rtt.as_millis()).unwrap_or(u64::MAX)
}

fn status_for(error: SurgeError) -> ProbeStatus {
    match error {
        SurgeError::Timeout { .. } => ProbeStatus::TimedOut,
        SurgeError::IOError(e) => match e.kind() {
            io::ErrorKind::HostUnreachable => ProbeStatus::DestinationHostUnreachable,
            io::ErrorKind::NetworkUnreachable => ProbeStatus::DestinationNetworkUnreachable,
            _ => ProbeStatus::Error(SurgeError::IOError(e).to_string()),
        },
        other => ProbeStatus::Error(other.to_string()),
    }
}

#[async_trait::async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        let Some(ip) = resolve_address(address).await else {
            return ProbeOutcome::failure(ProbeStatus::NameResolutionFailed);
        };

        let client = match self.client_for(ip).await {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::failure(ProbeStatus::Error(e.to_string())),
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.timeout);

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        match pinger.ping(PingSequence(seq), PAYLOAD).await {
            Ok((_, rtt)) => {
                let rtt_ms = round_trip_ms(rtt);
                debug!(%address, %ip, rtt_ms, "Echo reply");
                ProbeOutcome::success(rtt_ms)
            }
            Err(e) => {
                debug!(%address, %ip, error = %e, "Echo failed");
                ProbeOutcome::failure(status_for(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn literal_addresses_skip_dns() {
        assert_eq!(resolve_address("192.168.1.53").await, Some("192.168.1.53".parse().unwrap()));
        assert_eq!(resolve_address("::1").await, Some("::1".parse().unwrap()));
    }

    #[test]
    fn timeout_maps_to_timed_out() {
        let status = status_for(SurgeError::Timeout { seq: PingSequence(3) });
        assert_eq!(status, ProbeStatus::TimedOut);
        assert_eq!(status.to_string(), "TimedOut");
    }

    #[test]
    fn unreachable_host_and_network_are_reported_apart() {
        let host = status_for(SurgeError::IOError(io::Error::from(io::ErrorKind::HostUnreachable)));
        assert_eq!(host, ProbeStatus::DestinationHostUnreachable);
        assert_eq!(host.to_string(), "DestinationHostUnreachable");

        let network = status_for(SurgeError::IOError(io::Error::from(io::ErrorKind::NetworkUnreachable)));
        assert_eq!(network, ProbeStatus::DestinationNetworkUnreachable);
        assert_eq!(network.to_string(), "DestinationNetworkUnreachable");
    }

    #[test]
    fn other_io_errors_keep_their_text() {
        let status = status_for(SurgeError::IOError(io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(matches!(status, ProbeStatus::Error(_)));
    }

    #[test]
    fn round_trip_saturates_at_u64_max() {
        assert_eq!(round_trip_ms(Duration::from_micros(12_900)), 12);
        assert_eq!(round_trip_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn payload_is_32_bytes() {
        assert_eq!(PAYLOAD.len(), 32);
    }
}
