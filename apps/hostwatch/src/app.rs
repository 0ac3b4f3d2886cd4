//! Process wiring: token check, login, ready handling and the check loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::chat::session::SESSION_CHECK_INTERVAL;
use crate::chat::{ChatClient, ChatError, DiscordClient, watch_session};
use crate::config::{Config, ConfigError};
use crate::monitoring::{CheckLoop, IcmpProber, ProbeError, Prober};
use crate::notifier::{Console, Notifier};
use crate::ready::ReadySequencer;
use crate::registry::Registry;
use crate::targets::TargetSet;

/// Builds the outward-facing collaborators once the configuration is known.
pub trait Backend {
    fn connect(&self, config: &Config) -> Result<Arc<dyn ChatClient>, ChatError>;

    fn prober(&self) -> Result<Arc<dyn Prober>, ProbeError>;
}

/// Discord over HTTPS and real ICMP sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveBackend;

impl Backend for LiveBackend {
    fn connect(&self, config: &Config) -> Result<Arc<dyn ChatClient>, ChatError> {
        Ok(Arc::new(DiscordClient::new(config)?))
    }

    fn prober(&self) -> Result<Arc<dyn Prober>, ProbeError> {
        Ok(Arc::new(IcmpProber::new()?))
    }
}

pub struct App {
    registry: Arc<Registry>,
    console: Arc<dyn Console>,
    session_period: Duration,
}

impl App {
    pub fn new(registry: Arc<Registry>, console: Arc<dyn Console>) -> Self {
        Self { registry, console, session_period: SESSION_CHECK_INTERVAL }
    }

    /// How often the chat session is checked for readiness.
    pub fn with_session_period(mut self, period: Duration) -> Self {
        self.session_period = period;
        self
    }

    /// Run the monitor until `shutdown` resolves.
    ///
    /// A missing token is reported on the console and ends the run cleanly
    /// without probing anything. Login failures and chat delivery errors from
    /// the check loop are returned.
    pub async fn run<B, F>(self, config: Result<Config, ConfigError>, backend: &B, shutdown: F) -> Result<()>
    where
        B: Backend,
        F: Future<Output = ()>,
    {
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                Notifier::console_only(self.registry.clone(), self.console.clone())
                    .notify(&e.to_string(), TargetSet::none())
                    .await?;
                return Ok(());
            }
        };
        debug!("{config}");

        let chat = backend.connect(&config).context("Failed to build chat client")?;
        let user = chat.current_user().await.context("Failed to log in")?;
        info!(user = %user, hosts = self.registry.len(), "Logged in");

        let prober = backend.prober().context("Failed to set up the prober")?;
        let notifier = Notifier::new(self.registry.clone(), chat.clone(), self.console.clone());
        notifier.notify("Waiting for bot to be ready.", TargetSet::none()).await?;

        let (events, watcher) = watch_session(chat.clone(), self.session_period);
        let ready = ReadySequencer::new(self.registry.clone(), chat, notifier.clone()).spawn(events);

        let outcome = CheckLoop::new(self.registry.clone(), prober, notifier).run(shutdown).await;

        watcher.abort();
        ready.abort();
        outcome.context("Check loop stopped on a delivery error")
    }
}
