//! hostwatch - pings a fixed set of hosts and mirrors every result to the
//! Discord channel configured for that host.

pub mod app;
pub mod chat;
pub mod config;
pub mod monitoring;
pub mod notifier;
pub mod ready;
pub mod registry;
pub mod targets;

#[cfg(test)]
mod testing;

pub use app::{App, Backend, LiveBackend};
pub use config::{Config, ConfigError};
pub use notifier::{Console, Notifier, Stdout};
pub use registry::{HostEntry, HostId, Registry, TargetSlot};
pub use targets::TargetSet;
