use std::{env, fmt};

use thiserror::Error;

/// Environment variable holding the Discord bot token.
pub const TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please set the DISCORD_BOT_TOKEN environment variable before running.")]
    MissingToken,
}

/// Runtime configuration. The bot token is the only setting; the host list
/// is compiled in.
#[derive(Clone)]
pub struct Config {
    token: String,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_token(env::var(TOKEN_VAR).unwrap_or_default())
    }

    /// Blank tokens are treated the same as a missing one.
    pub fn from_token(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self { token: token.trim().to_string() })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn masked_token(&self) -> String {
        let visible: String = self.token.chars().take(4).collect();
        format!("{visible}… ({} chars)", self.token.chars().count())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").field("token", &self.masked_token()).finish()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_1 = write_indented(1);

        writeln!(f, "Current Configuration State:")?;
        writeln!(f, "  Discord")?;
        write_1(f, "Token", &self.masked_token())?;

        Ok(())
    }
}
