//! Discord REST client.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{ChannelHandle, ChatClient, ChatError, CurrentUser};
use crate::config::Config;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10/";

const REQUEST_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = concat!("DiscordBot (hostwatch, ", env!("CARGO_PKG_VERSION"), ")");

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelPayload {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Whether a Discord channel type can receive text messages.
///
/// Categories (4), directories (14), forums (15) and media channels (16) only
/// hold other channels or threads.
fn is_message_channel(kind: u8) -> bool {
    !matches!(kind, 4 | 14 | 15 | 16)
}

fn parse_snowflake(raw: &str) -> Result<u64, ChatError> {
    raw.parse().map_err(|_| ChatError::Malformed(format!("invalid snowflake `{raw}`")))
}

/// Chat client speaking to the Discord HTTP API with a bot token.
pub struct DiscordClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl DiscordClient {
    pub fn new(config: &Config) -> Result<Self, ChatError> {
        Self::with_base_url(config, DEFAULT_API_BASE)
    }

    /// Build a client against another API root, e.g. a local stand-in server.
    pub fn with_base_url(config: &Config, base: &str) -> Result<Self, ChatError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, base, token: config.token().to_string() })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ChatError> {
        Ok(self.base.join(path)?)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn unexpected(response: Response) -> ChatError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return ChatError::Unauthorized;
        }
        let body = response.text().await.unwrap_or_default();
        ChatError::Status { status: status.as_u16(), body }
    }
}

#[async_trait::async_trait]
impl ChatClient for DiscordClient {
    async fn current_user(&self) -> Result<CurrentUser, ChatError> {
        let url = self.endpoint("users/@me")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }

        let user: UserPayload = response.json().await?;
        Ok(CurrentUser {
            id: parse_snowflake(&user.id)?,
            username: user.username,
            discriminator: user.discriminator.unwrap_or_else(|| "0".to_string()),
        })
    }

    async fn resolve_channel(&self, id: u64) -> Result<Option<ChannelHandle>, ChatError> {
        let url = self.endpoint(&format!("channels/{id}"))?;
        let response = self.authorized(self.http.get(url)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                debug!(channel_id = id, status = %response.status(), "Channel not visible to the bot");
                return Ok(None);
            }
            status if !status.is_success() => return Err(Self::unexpected(response).await),
            _ => {}
        }

        let channel: ChannelPayload = response.json().await?;
        if !is_message_channel(channel.kind) {
            debug!(channel_id = id, kind = channel.kind, "Channel cannot hold messages");
            return Ok(None);
        }

        let mut handle = ChannelHandle::new(parse_snowflake(&channel.id)?);
        handle.name = channel.name;
        Ok(Some(handle))
    }

    async fn send_message(&self, channel: &ChannelHandle, content: &str) -> Result<(), ChatError> {
        let url = self.endpoint(&format!("channels/{}/messages", channel.id))?;
        let response = self
            .authorized(self.http.post(url))
            .json(&CreateMessage { content })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::unexpected(response).await);
        }
        Ok(())
    }
}
