//! Connection-ready signalling on top of a [`ChatClient`].
//!
//! The REST API has no push events, so readiness is derived by polling the
//! bot's own identity: the first successful poll is a ready event, and so is
//! every success that follows a failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use super::{ChatClient, ChatError, CurrentUser};

pub const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The client is connected and authenticated as this user.
    Ready(CurrentUser),
    /// A previously ready session stopped answering.
    Disconnected,
}

/// Spawn a watcher emitting [`SessionEvent`]s for `chat`.
///
/// The watcher stops when the receiver is dropped or the token is rejected.
pub fn watch_session(
    chat: Arc<dyn ChatClient>,
    period: Duration,
) -> (mpsc::Receiver<SessionEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut connected = false;

        loop {
            timer.tick().await;
            if tx.is_closed() {
                debug!("Session receiver dropped, stopping watcher");
                break;
            }

            match chat.current_user().await {
                Ok(user) if !connected => {
                    info!(user = %user, "Chat session ready");
                    connected = true;
                    if tx.send(SessionEvent::Ready(user)).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(ChatError::Unauthorized) => {
                    error!("Bot token rejected, stopping session watcher");
                    break;
                }
                Err(e) if connected => {
                    warn!("Chat session lost: {}", e);
                    connected = false;
                    if tx.send(SessionEvent::Disconnected).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("Chat session still unavailable: {}", e);
                }
            }
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChannelHandle;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Step {
        Up,
        Down,
        Rejected,
    }

    /// Answers `current_user` from a script, then stays up.
    struct ScriptedChat {
        script: Mutex<VecDeque<Step>>,
    }

    impl ScriptedChat {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self { script: Mutex::new(steps.into()) })
        }
    }

    fn bot() -> CurrentUser {
        CurrentUser { id: 7, username: "pingbot".into(), discriminator: "0".into() }
    }

    #[async_trait::async_trait]
    impl ChatClient for ScriptedChat {
        async fn current_user(&self) -> Result<CurrentUser, ChatError> {
            match self.script.lock().unwrap().pop_front().unwrap_or(Step::Up) {
                Step::Up => Ok(bot()),
                Step::Rejected => Err(ChatError::Unauthorized),
                Step::Down => Err(ChatError::Status { status: 502, body: "bad gateway".into() }),
            }
        }

        async fn resolve_channel(&self, _id: u64) -> Result<Option<ChannelHandle>, ChatError> {
            Ok(None)
        }

        async fn send_message(&self, _channel: &ChannelHandle, _content: &str) -> Result<(), ChatError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_ready_once_while_connected() {
        let chat = ScriptedChat::new(vec![Step::Up, Step::Up, Step::Up]);
        let (mut rx, handle) = watch_session(chat, Duration::from_secs(30));

        assert_eq!(rx.recv().await, Some(SessionEvent::Ready(bot())));

        tokio::time::sleep(Duration::from_secs(65)).await;
        assert!(rx.try_recv().is_err());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn reconnection_triggers_a_new_ready() {
        let chat = ScriptedChat::new(vec![Step::Down, Step::Up, Step::Down, Step::Down, Step::Up]);
        let (mut rx, handle) = watch_session(chat, Duration::from_secs(30));

        assert_eq!(rx.recv().await, Some(SessionEvent::Ready(bot())));
        assert_eq!(rx.recv().await, Some(SessionEvent::Disconnected));
        assert_eq!(rx.recv().await, Some(SessionEvent::Ready(bot())));
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_token_stops_watcher() {
        let chat = ScriptedChat::new(vec![Step::Rejected]);
        let (mut rx, handle) = watch_session(chat, Duration::from_secs(30));

        assert_eq!(rx.recv().await, None);
        handle.await.unwrap();
    }
}
