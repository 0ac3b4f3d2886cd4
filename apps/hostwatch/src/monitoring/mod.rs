//! Monitoring module - probes the registered hosts and reports the results
//!
//! This module is responsible for:
//! - Sending ICMP echo requests to each host
//! - Turning outcomes into notification text
//! - Repeating the sweep on a fixed cadence

pub mod checker;
pub mod scheduler;
pub mod types;

pub use checker::{IcmpProber, ProbeError, Prober};
pub use scheduler::{CheckLoop, SWEEP_INTERVAL};
pub use types::{FAILURE_MENTION, ProbeOutcome, ProbeResult, ProbeStatus};
