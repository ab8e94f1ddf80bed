use futures::StreamExt;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;

use crate::client::platform::{MembershipSource, PlatformError, StatsChannel};
use crate::client::stats::message::StatsMessage;
use crate::client::stats::model::{GuildEmoji, Member, MembershipSnapshot};

/** Reads the configured guild over HTTP. */
pub struct DiscordGuild {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl DiscordGuild {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        DiscordGuild { http, guild_id }
    }
}

#[async_trait]
impl MembershipSource for DiscordGuild {
    async fn snapshot(&self) -> Result<MembershipSnapshot, PlatformError> {
        let guild = self.guild_id.to_partial_guild(&self.http).await?;

        let mut members = Vec::new();
        let mut pages = Box::pin(self.guild_id.members_iter(Arc::clone(&self.http)));
        while let Some(member) = pages.next().await {
            let member = member?;
            members.push(Member {
                id: member.user.id.0,
                is_bot: member.user.bot,
                role_ids: member.roles.iter().map(|role| role.0.to_string()).collect(),
            });
        }

        // Sorted so that duplicate emoji names always resolve to the same one.
        let mut emojis: Vec<_> = guild.emojis.into_values().collect();
        emojis.sort_by_key(|emoji| emoji.id);

        Ok(MembershipSnapshot {
            guild_name: guild.name,
            members,
            emojis: emojis
                .into_iter()
                .map(|emoji| GuildEmoji {
                    glyph: emoji.to_string(),
                    name: emoji.name,
                })
                .collect(),
        })
    }
}

/** The statistics channel, written over HTTP. */
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        DiscordChannel { http, channel_id }
    }
}

#[async_trait]
impl StatsChannel for DiscordChannel {
    async fn bulk_delete(&self, limit: u64) -> Result<usize, PlatformError> {
        let messages = self
            .channel_id
            .messages(&self.http, |retriever| retriever.limit(limit))
            .await?;
        if messages.is_empty() {
            return Ok(0);
        }
        self.channel_id
            .delete_messages(&self.http, messages.iter().map(|message| message.id))
            .await?;
        Ok(messages.len())
    }

    async fn send(&self, message: &StatsMessage) -> Result<(), PlatformError> {
        self.channel_id
            .send_message(&self.http, |m| {
                m.embed(|e| {
                    e.title(&message.title)
                        .description(&message.description)
                        .colour(message.colour)
                        .thumbnail(&message.thumbnail_url)
                        .timestamp(message.timestamp)
                        .footer(|f| f.icon_url(&message.footer_icon_url).text(&message.footer_text));
                    for field in &message.fields {
                        e.field(&field.name, &field.value, field.inline);
                    }
                    e
                })
            })
            .await?;
        Ok(())
    }
}
