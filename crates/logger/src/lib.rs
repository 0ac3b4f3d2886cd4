//! Shared tracing bootstrap for hostwatch binaries.

mod subscriber;

pub use subscriber::{LogFormat, init_tracing};
