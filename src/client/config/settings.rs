use serenity::model::id::{ChannelId, GuildId, UserId};
use std::env;

use crate::client::config::errors::ConfigError;

pub const DEFAULT_ROLES_FILE: &str = "./roles.json";

/** Everything the bot reads from the environment at startup. */
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub bot_id: UserId,
    pub icon_url: String,
    pub roles_file: String,
}

impl Settings {
    pub fn from_env() -> Result<Settings, ConfigError> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup so it can be exercised without touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
        };
        let snowflake = |key: &str| {
            let value = required(key)?;
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidId {
                    key: key.to_owned(),
                    value,
                })
        };

        Ok(Settings {
            token: required("DISCORD_TOKEN")?,
            guild_id: GuildId(snowflake("GUILD_ID")?),
            channel_id: ChannelId(snowflake("CHANNEL_ID")?),
            bot_id: UserId(snowflake("BOT_ID")?),
            icon_url: required("ICON_URL")?,
            roles_file: lookup("ROLES_FILE")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROLES_FILE.to_owned()),
        })
    }
}
