use serenity::model::id::{ChannelId, GuildId, UserId};
use thiserror::Error;

use crate::client::config::errors::RoleConfigError;

/** Any failure in the startup chain. The bot never starts refreshing after one of these. */
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Could not find specified guild {0}: {1}")]
    GuildNotFound(GuildId, serenity::Error),

    #[error("Could not find specified channel {0}: {1}")]
    ChannelNotFound(ChannelId, serenity::Error),

    #[error("Channel {0} is not a channel of guild {1}")]
    ChannelNotInGuild(ChannelId, GuildId),

    #[error("Bot user {0} is not a member of the guild: {1}")]
    BotNotMember(UserId, serenity::Error),

    #[error("Bot is not an admin!")]
    MissingAdministrator,

    #[error(transparent)]
    RoleConfig(#[from] RoleConfigError),
}
