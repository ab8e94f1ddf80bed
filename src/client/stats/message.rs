use itertools::Itertools;
use serenity::model::Timestamp;

use crate::client::stats::model::{CategoryStats, RoleCount, StatsSummary};

/// Embed colour of the statistics message.
pub const STATS_COLOUR: u32 = 8462170;

/// Zero width space. Discord rejects empty field names and trims trailing whitespace.
const ZERO_WIDTH_SPACE: &str = "\u{200b}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/** The rendered statistics document sent to the channel as a single embed. */
#[derive(Debug, Clone, PartialEq)]
pub struct StatsMessage {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub thumbnail_url: String,
    pub fields: Vec<StatsField>,
    pub footer_text: String,
    pub footer_icon_url: String,
    pub timestamp: Timestamp,
}

impl StatsMessage {
    /** Lays out a summary as an embed: one inline field per category. */
    pub fn compose(
        summary: &StatsSummary,
        guild_name: &str,
        icon_url: &str,
        timestamp: Timestamp,
    ) -> StatsMessage {
        StatsMessage {
            title: format!("<{}> SERVER STATS", guild_name),
            description: format!("Guild Members: {}", summary.total_human_members),
            colour: STATS_COLOUR,
            thumbnail_url: icon_url.to_owned(),
            fields: summary
                .categories
                .iter()
                .map(|category| StatsField {
                    name: ZERO_WIDTH_SPACE.to_owned(),
                    value: category_block(category),
                    inline: true,
                })
                .collect(),
            footer_text: format!("© <{}>", guild_name),
            footer_icon_url: icon_url.to_owned(),
            timestamp,
        }
    }
}

fn category_block(stats: &CategoryStats) -> String {
    std::iter::once(format!("**{}**", stats.category.heading()))
        .chain(stats.entries.iter().map(entry_line))
        .join("\n\n")
}

fn entry_line(count: &RoleCount) -> String {
    let mention = format!(
        "<@&{}>: **{}**{}",
        count.entry.id, count.count, ZERO_WIDTH_SPACE
    );
    match count.emoji {
        Some(ref emoji) => format!("{} {}", emoji, mention),
        None => mention,
    }
}
