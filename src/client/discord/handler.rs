use once_cell::sync::OnceCell;
use serenity::async_trait;
use serenity::model::event::ResumedEvent;
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::client::config::settings::Settings;
use crate::client::discord::startup;
use crate::client::platform::MembershipSink;

/// Gateway event handler.
///
/// Holds a single membership sink, registered once the startup chain succeeds. Until then
/// the bot is uninitialised and membership events are dropped. The startup chain runs at most
/// once per process; a failed chain is never retried.
pub struct Handler {
    settings: Settings,
    startup_attempted: AtomicBool,
    sink: OnceCell<Arc<dyn MembershipSink>>,
}

impl Handler {
    pub fn new(settings: Settings) -> Self {
        Handler {
            settings,
            startup_attempted: AtomicBool::new(false),
            sink: OnceCell::new(),
        }
    }

    /** Returns false if a sink was already registered; the first one stays. */
    pub fn register_sink(&self, sink: Arc<dyn MembershipSink>) -> bool {
        self.sink.set(sink).is_ok()
    }

    /// Runs `initialise` unless a startup attempt was already made, and registers the sink it
    /// produces. Returns the sink only when this call registered it.
    async fn start_once<F, Fut, E>(&self, initialise: F) -> Option<Arc<dyn MembershipSink>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn MembershipSink>, E>>,
        E: Display,
    {
        if self.startup_attempted.swap(true, Ordering::SeqCst) {
            debug!("Startup already attempted, not running it again");
            return None;
        }

        let sink = match initialise().await {
            Ok(sink) => sink,
            Err(why) => {
                error!("Startup aborted: {}", why);
                return None;
            }
        };
        info!("SUCCESS!");

        if !self.register_sink(sink.clone()) {
            warn!("A refresh controller was already registered, discarding this one");
            return None;
        }
        Some(sink)
    }

    async fn notify(&self, guild_id: GuildId, event: &str) {
        if guild_id != self.settings.guild_id {
            return;
        }
        match self.sink.get() {
            Some(sink) => {
                debug!("{} in guild {}, refreshing stats", event, guild_id);
                sink.membership_changed().await;
            }
            None => debug!("Ignoring {}: startup has not completed", event),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);

        // Reconnects fire ready again; only the first one runs the startup chain.
        if let Some(sink) = self.sink.get() {
            sink.membership_changed().await;
            return;
        }

        let (ctx, settings) = (&ctx, &self.settings);
        let started = self
            .start_once(move || async move {
                startup::initialise(ctx, settings)
                    .await
                    .map(|controller| Arc::new(controller) as Arc<dyn MembershipSink>)
            })
            .await;
        if let Some(sink) = started {
            sink.membership_changed().await;
        }
    }

    async fn resume(&self, _: Context, _: ResumedEvent) {
        info!("Resumed");
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        self.notify(new_member.guild_id, "Member added").await;
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        _user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.notify(guild_id, "Member removed").await;
    }

    async fn guild_member_update(
        &self,
        _ctx: Context,
        _old_if_available: Option<Member>,
        new: Member,
    ) {
        self.notify(new.guild_id, "Member updated").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingSink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MembershipSink for CountingSink {
        async fn membership_changed(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn handler() -> Handler {
        let settings = Settings::from_lookup(|key| match key {
            "DISCORD_TOKEN" => Some("token".to_owned()),
            "GUILD_ID" => Some("1".to_owned()),
            "CHANNEL_ID" => Some("2".to_owned()),
            "BOT_ID" => Some("3".to_owned()),
            "ICON_URL" => Some("icon".to_owned()),
            _ => None,
        })
        .expect("Settings should load");
        Handler::new(settings)
    }

    #[tokio::test]
    async fn test_events_before_startup_are_dropped() {
        let handler = handler();
        handler.notify(GuildId(1), "Member added").await;
        assert!(handler.sink.get().is_none());
    }

    #[tokio::test]
    async fn test_registered_sink_receives_configured_guild_only() {
        let handler = handler();
        let sink = Arc::new(CountingSink::default());
        assert!(handler.register_sink(sink.clone()));

        handler.notify(GuildId(1), "Member added").await;
        handler.notify(GuildId(99), "Member added").await;
        handler.notify(GuildId(1), "Member updated").await;

        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_startup_is_not_retried() {
        let handler = handler();
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let failing = move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<Arc<dyn MembershipSink>, _>("Bot is not an admin!")
        };

        assert!(handler.start_once(failing).await.is_none());
        assert!(handler.start_once(failing).await.is_none());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handler.sink.get().is_none());
    }

    #[tokio::test]
    async fn test_successful_startup_registers_sink_once() {
        let handler = handler();
        let sink = Arc::new(CountingSink::default());
        let counter = AtomicUsize::new(0);
        let (attempts, registered) = (&counter, &sink);
        let succeeding = move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok::<Arc<dyn MembershipSink>, String>(registered.clone())
        };

        let started = handler.start_once(succeeding).await;
        assert!(started.is_some());
        assert!(handler.start_once(succeeding).await.is_none());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        handler.notify(GuildId(1), "Member added").await;
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_first_sink_is_kept() {
        let handler = handler();
        assert!(handler.register_sink(Arc::new(CountingSink::default())));
        assert!(!handler.register_sink(Arc::new(CountingSink::default())));
    }
}
