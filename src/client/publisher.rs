use serenity::model::Timestamp;
use tracing::{debug, warn};

use crate::client::platform::{PlatformError, StatsChannel};
use crate::client::stats::message::StatsMessage;
use crate::client::stats::model::StatsSummary;

/// Most messages a single bulk delete may remove. Anything older stays in the channel.
pub const BULK_DELETE_LIMIT: u64 = 100;

/** Replaces the contents of the statistics channel with a freshly rendered summary. */
pub struct ChannelPublisher<C> {
    channel: C,
    icon_url: String,
}

impl<C: StatsChannel> ChannelPublisher<C> {
    pub fn new(channel: C, icon_url: impl Into<String>) -> Self {
        ChannelPublisher {
            channel,
            icon_url: icon_url.into(),
        }
    }

    /// Clears the channel, then sends exactly one stats message.
    ///
    /// A failed delete is logged and the send still happens. A failed send is returned to the
    /// caller; the next membership change will publish again.
    pub async fn publish(
        &self,
        summary: &StatsSummary,
        guild_name: &str,
    ) -> Result<(), PlatformError> {
        match self.channel.bulk_delete(BULK_DELETE_LIMIT).await {
            Ok(removed) => debug!("Cleared {} message(s) from the stats channel", removed),
            Err(why) => warn!("Could not clear the stats channel: {}", why),
        }

        let message = StatsMessage::compose(summary, guild_name, &self.icon_url, Timestamp::now());
        self.channel.send(&message).await
    }
}
