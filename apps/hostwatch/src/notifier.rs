//! Fan-out of log messages to the console and the hosts' chat channels.

use std::sync::Arc;

use tracing::debug;

use crate::chat::{ChatClient, ChatError};
use crate::registry::{Registry, TargetSlot};
use crate::targets::TargetSet;

/// Local line sink every notification is mirrored to.
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Console writing to the process stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Console for Stdout {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

#[derive(Clone)]
pub struct Notifier {
    registry: Arc<Registry>,
    chat: Option<Arc<dyn ChatClient>>,
    console: Arc<dyn Console>,
}

impl Notifier {
    pub fn new(registry: Arc<Registry>, chat: Arc<dyn ChatClient>, console: Arc<dyn Console>) -> Self {
        Self { registry, chat: Some(chat), console }
    }

    /// Notifier used before any chat client exists.
    pub fn console_only(registry: Arc<Registry>, console: Arc<dyn Console>) -> Self {
        Self { registry, chat: None, console }
    }

    /// Write `message` to the console, then post it to every targeted host
    /// whose channel is resolved.
    ///
    /// Hosts without a resolved channel are skipped. Delivery errors are
    /// returned as-is and abort the remaining deliveries.
    pub async fn notify(&self, message: &str, targets: TargetSet) -> Result<(), ChatError> {
        self.console.write_line(&format!("{targets} - {message}"));

        let Some(chat) = &self.chat else {
            return Ok(());
        };

        for entry in self.registry.iter().filter(|entry| targets.contains(entry.id)) {
            match entry.target().await {
                TargetSlot::Resolved(channel) => {
                    chat.send_message(&channel, message).await?;
                }
                slot => {
                    debug!(host = %entry.id, ?slot, "No channel to deliver to, console only");
                }
            }
        }

        Ok(())
    }
}
