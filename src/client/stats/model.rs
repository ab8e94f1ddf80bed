use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/** A single counted role as declared in the role configuration file. */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub id: String,
    /// Name of a guild custom emoji shown next to the role.
    #[serde(default)]
    pub emoji: Option<String>,
}

/** The three ordered role lists the bot counts. Declaration order is display order. */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub classes: Vec<RoleEntry>,
    pub roles: Vec<RoleEntry>,
    pub professions: Vec<RoleEntry>,
}

impl RoleConfig {
    /// Every category paired with its entries, in display order.
    pub fn categories(&self) -> [(Category, &[RoleEntry]); 3] {
        [
            (Category::Classes, self.classes.as_slice()),
            (Category::Roles, self.roles.as_slice()),
            (Category::Professions, self.professions.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Classes,
    Roles,
    Professions,
}

impl Category {
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Classes => "Classes",
            Category::Roles => "Roles",
            Category::Professions => "Professions",
        }
    }
}

/** Read-only view of a guild member. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub is_bot: bool,
    pub role_ids: HashSet<String>,
}

/** A custom emoji available in the guild. `glyph` is the chat markup that renders it. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEmoji {
    pub name: String,
    pub glyph: String,
}

/** Point-in-time read of the guild, taken fresh for every refresh. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipSnapshot {
    pub guild_name: String,
    pub members: Vec<Member>,
    pub emojis: Vec<GuildEmoji>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCount {
    pub entry: RoleEntry,
    pub count: usize,
    /// Resolved emoji markup, `None` when the configured name matched nothing.
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub entries: Vec<RoleCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub total_human_members: usize,
    pub categories: Vec<CategoryStats>,
}

#[cfg(test)]
impl StatsSummary {
    pub fn category(&self, category: Category) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|stats| stats.category == category)
    }
}
