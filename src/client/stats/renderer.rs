use crate::client::stats::model::{
    CategoryStats, GuildEmoji, Member, MembershipSnapshot, RoleConfig, RoleCount, RoleEntry,
    StatsSummary,
};

/// Counts human members per configured role.
///
/// Bots are excluded everywhere. Role ids that match nobody (or that no longer exist in the
/// guild) count as zero, and emoji names that match no guild emoji render without a glyph.
pub fn render_stats(config: &RoleConfig, snapshot: &MembershipSnapshot) -> StatsSummary {
    let humans: Vec<&Member> = snapshot
        .members
        .iter()
        .filter(|member| !member.is_bot)
        .collect();

    let categories = config
        .categories()
        .into_iter()
        .map(|(category, entries)| CategoryStats {
            category,
            entries: entries
                .iter()
                .map(|entry| count_role(entry, &humans, &snapshot.emojis))
                .collect(),
        })
        .collect();

    StatsSummary {
        total_human_members: humans.len(),
        categories,
    }
}

fn count_role(entry: &RoleEntry, humans: &[&Member], emojis: &[GuildEmoji]) -> RoleCount {
    RoleCount {
        entry: entry.clone(),
        count: humans
            .iter()
            .filter(|member| member.role_ids.contains(&entry.id))
            .count(),
        emoji: entry
            .emoji
            .as_deref()
            .and_then(|name| resolve_emoji(emojis, name)),
    }
}

/** First guild emoji with an exactly matching name. */
fn resolve_emoji(emojis: &[GuildEmoji], name: &str) -> Option<String> {
    emojis
        .iter()
        .find(|emoji| emoji.name == name)
        .map(|emoji| emoji.glyph.clone())
}
