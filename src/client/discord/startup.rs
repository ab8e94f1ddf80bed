use serenity::model::guild::PartialGuild;
use serenity::model::id::RoleId;
use serenity::model::permissions::Permissions;
use serenity::prelude::*;
use tracing::info;

use crate::client::config::roles::load_role_config;
use crate::client::config::settings::Settings;
use crate::client::discord::errors::StartupError;
use crate::client::discord::platform::{DiscordChannel, DiscordGuild};
use crate::client::publisher::ChannelPublisher;
use crate::client::refresh::RefreshController;

pub type DiscordRefreshController = RefreshController<DiscordGuild, DiscordChannel>;

/// Runs the startup chain in order: guild, channel, admin check, role file.
///
/// The first failure aborts the chain and is returned as is.
pub async fn initialise(
    ctx: &Context,
    settings: &Settings,
) -> Result<DiscordRefreshController, StartupError> {
    info!("Trying to access server...");
    let guild = settings
        .guild_id
        .to_partial_guild(&ctx.http)
        .await
        .map_err(|why| StartupError::GuildNotFound(settings.guild_id, why))?;

    info!("Trying to find statistics channel...");
    let channel = settings
        .channel_id
        .to_channel(ctx)
        .await
        .map_err(|why| StartupError::ChannelNotFound(settings.channel_id, why))?;
    if !channel
        .guild()
        .map_or(false, |channel| channel.guild_id == guild.id)
    {
        return Err(StartupError::ChannelNotInGuild(settings.channel_id, guild.id));
    }

    info!("Checking if bot has Administrator privileges...");
    let bot = guild
        .id
        .member(ctx, settings.bot_id)
        .await
        .map_err(|why| StartupError::BotNotMember(settings.bot_id, why))?;
    if !is_administrator(&guild, settings.bot_id == guild.owner_id, &bot.roles) {
        return Err(StartupError::MissingAdministrator);
    }

    info!("Loading roles...");
    let roles = load_role_config(&settings.roles_file).await?;

    Ok(RefreshController::new(
        DiscordGuild::new(ctx.http.clone(), settings.guild_id),
        ChannelPublisher::new(
            DiscordChannel::new(ctx.http.clone(), settings.channel_id),
            settings.icon_url.clone(),
        ),
        roles,
    ))
}

fn is_administrator(guild: &PartialGuild, is_owner: bool, member_roles: &[RoleId]) -> bool {
    // The @everyone role shares the guild's id.
    let everyone = RoleId(guild.id.0);
    let granted = std::iter::once(&everyone)
        .chain(member_roles)
        .filter_map(|role_id| guild.roles.get(role_id))
        .map(|role| role.permissions);
    grants_administrator(is_owner, granted)
}

/** Guild owners are implicitly administrators. Otherwise any role carrying the flag suffices. */
pub fn grants_administrator(
    is_owner: bool,
    role_permissions: impl IntoIterator<Item = Permissions>,
) -> bool {
    is_owner
        || role_permissions
            .into_iter()
            .any(|permissions| permissions.contains(Permissions::ADMINISTRATOR))
}
