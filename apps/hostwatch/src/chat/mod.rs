//! Chat platform seam
//!
//! The monitor only needs four things from a chat platform: who it is logged
//! in as, turning a numeric channel id into something it can post to, posting
//! plain text, and a signal telling it the connection is ready. The first
//! three live on [`ChatClient`]; the ready signal is produced by
//! [`session::watch_session`] on top of it.

pub mod discord;
pub mod session;

pub use discord::DiscordClient;
pub use session::{SessionEvent, watch_session};

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Bot token was rejected by the chat platform")]
    Unauthorized,
    #[error("Unexpected response status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A channel messages can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: u64,
    pub name: Option<String>,
}

impl ChannelHandle {
    pub fn new(id: u64) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Identity of the logged-in bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: u64,
    pub username: String,
    pub discriminator: String,
}

impl fmt::Display for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Accounts migrated to unique usernames report a "0" discriminator.
        if self.discriminator.is_empty() || self.discriminator == "0" {
            write!(f, "{}", self.username)
        } else {
            write!(f, "{}#{}", self.username, self.discriminator)
        }
    }
}

#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Fetch the account the client is authenticated as.
    async fn current_user(&self) -> Result<CurrentUser, ChatError>;

    /// Resolve a channel id into a sendable handle.
    ///
    /// `Ok(None)` means the channel does not exist, is not visible to the bot
    /// or cannot carry text messages.
    async fn resolve_channel(&self, id: u64) -> Result<Option<ChannelHandle>, ChatError>;

    /// Post `content` verbatim to `channel`.
    async fn send_message(&self, channel: &ChannelHandle, content: &str) -> Result<(), ChatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_user_display() {
        let legacy = CurrentUser { id: 1, username: "pingbot".into(), discriminator: "4821".into() };
        assert_eq!(legacy.to_string(), "pingbot#4821");

        let migrated = CurrentUser { id: 1, username: "pingbot".into(), discriminator: "0".into() };
        assert_eq!(migrated.to_string(), "pingbot");
    }
}
