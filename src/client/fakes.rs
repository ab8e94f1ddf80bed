//! In-memory stand-ins for the Discord side of the bot, used by the unit tests.

use serenity::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::client::platform::{MembershipSource, PlatformError, StatsChannel};
use crate::client::stats::message::StatsMessage;
use crate::client::stats::model::{Member, MembershipSnapshot, RoleEntry};

pub fn entry(id: &str, emoji: Option<&str>) -> RoleEntry {
    RoleEntry {
        id: id.to_owned(),
        emoji: emoji.map(str::to_owned),
    }
}

pub fn member(id: u64, is_bot: bool, roles: &[&str]) -> Member {
    Member {
        id,
        is_bot,
        role_ids: roles.iter().map(|role| role.to_string()).collect::<HashSet<_>>(),
    }
}

pub fn snapshot(members: Vec<Member>) -> MembershipSnapshot {
    MembershipSnapshot {
        guild_name: "Guild".to_owned(),
        members,
        emojis: vec![],
    }
}

pub struct FakeGuild {
    members: Mutex<Vec<Member>>,
    pub fail_snapshot: AtomicBool,
    pub panic_snapshot: AtomicBool,
}

impl FakeGuild {
    pub fn new(members: Vec<Member>) -> Self {
        FakeGuild {
            members: Mutex::new(members),
            fail_snapshot: AtomicBool::new(false),
            panic_snapshot: AtomicBool::new(false),
        }
    }

    pub fn set_members(&self, members: Vec<Member>) {
        *self.members.lock().unwrap() = members;
    }
}

#[async_trait]
impl MembershipSource for FakeGuild {
    async fn snapshot(&self) -> Result<MembershipSnapshot, PlatformError> {
        if self.panic_snapshot.load(Ordering::SeqCst) {
            panic!("guild read blew up");
        }
        if self.fail_snapshot.load(Ordering::SeqCst) {
            return Err(serenity::Error::Other("snapshot unavailable").into());
        }
        Ok(snapshot(self.members.lock().unwrap().clone()))
    }
}

/** Lets a test hold a send open: `entered` fires when a send starts, `release` lets it finish. */
#[derive(Default)]
pub struct SendGate {
    pub entered: Notify,
    pub release: Notify,
}

/// A channel whose history is the descriptions of its messages, oldest first.
#[derive(Default)]
pub struct FakeChannel {
    history: Mutex<Vec<String>>,
    last_sent: Mutex<Option<StatsMessage>>,
    gate: Option<Arc<SendGate>>,
    pub fail_delete: AtomicBool,
    pub fail_send: AtomicBool,
    pub sends: AtomicUsize,
}

impl FakeChannel {
    pub fn with_history(messages: usize) -> Self {
        FakeChannel {
            history: Mutex::new((0..messages).map(|i| format!("old message {}", i)).collect()),
            ..Default::default()
        }
    }

    pub fn gated() -> Self {
        FakeChannel {
            gate: Some(Arc::new(SendGate::default())),
            ..Default::default()
        }
    }

    pub fn gate(&self) -> Option<Arc<SendGate>> {
        self.gate.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Option<StatsMessage> {
        self.last_sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsChannel for FakeChannel {
    async fn bulk_delete(&self, limit: u64) -> Result<usize, PlatformError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(serenity::Error::Other("delete rejected").into());
        }
        let mut history = self.history.lock().unwrap();
        let keep = history.len().saturating_sub(limit as usize);
        let removed = history.len() - keep;
        history.truncate(keep);
        Ok(removed)
    }

    async fn send(&self, message: &StatsMessage) -> Result<(), PlatformError> {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(serenity::Error::Other("send rejected").into());
        }
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.history
            .lock()
            .unwrap()
            .push(message.description.clone());
        *self.last_sent.lock().unwrap() = Some(message.clone());
        Ok(())
    }
}
