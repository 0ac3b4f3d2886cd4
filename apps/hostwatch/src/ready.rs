//! Work done each time the chat connection becomes ready.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::chat::{ChatClient, ChatError, CurrentUser, SessionEvent};
use crate::notifier::Notifier;
use crate::registry::{Registry, TargetSlot};
use crate::targets::TargetSet;

/// Resolves every host's channel id whenever the session becomes ready.
#[derive(Clone)]
pub struct ReadySequencer {
    registry: Arc<Registry>,
    chat: Arc<dyn ChatClient>,
    notifier: Notifier,
}

impl ReadySequencer {
    pub fn new(registry: Arc<Registry>, chat: Arc<dyn ChatClient>, notifier: Notifier) -> Self {
        Self { registry, chat, notifier }
    }

    /// Run one ready sequence.
    ///
    /// Every host is resolved again and its slot overwritten, so repeating the
    /// sequence with the same channels leaves the registry unchanged. A host
    /// whose channel cannot be resolved gets a console-only report and does
    /// not stop the others.
    pub async fn on_ready(&self, user: &CurrentUser) -> Result<(), ChatError> {
        self.notifier
            .notify(&format!("Logged in as {user}."), TargetSet::all())
            .await?;

        for entry in self.registry.iter() {
            let resolved = match self.chat.resolve_channel(entry.notify_target_id).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!(host = %entry.id, channel_id = entry.notify_target_id, "Channel lookup failed: {}", e);
                    None
                }
            };

            match resolved {
                Some(channel) => {
                    info!(host = %entry.id, channel_id = channel.id, "Resolved notification channel");
                    entry.set_target(TargetSlot::Resolved(channel)).await;
                }
                None => {
                    entry.set_target(TargetSlot::Failed).await;
                    self.notifier
                        .notify(
                            &format!("Couldn't find channel with ID: {}.", entry.notify_target_id),
                            TargetSet::only(entry.id),
                        )
                        .await?;
                }
            }
        }

        self.notifier.notify("Bot is ready.", TargetSet::all()).await
    }

    /// Handle session events until the sender side closes.
    pub fn spawn(self, mut events: mpsc::Receiver<SessionEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SessionEvent::Ready(user) => {
                        if let Err(e) = self.on_ready(&user).await {
                            error!("Ready sequence failed: {}", e);
                        }
                    }
                    SessionEvent::Disconnected => {
                        warn!("Chat session disconnected, waiting for the next ready event");
                    }
                }
            }
        })
    }
}
