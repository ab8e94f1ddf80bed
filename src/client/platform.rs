use serenity::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::client::stats::message::StatsMessage;
use crate::client::stats::model::MembershipSnapshot;

/** Failure of a call into the chat platform. Never fatal during a refresh. */
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Supplies a fresh view of guild membership for each refresh.
#[async_trait]
pub trait MembershipSource: Send + Sync {
    async fn snapshot(&self) -> Result<MembershipSnapshot, PlatformError>;
}

/// The channel the statistics message lives in.
#[async_trait]
pub trait StatsChannel: Send + Sync {
    /** Deletes at most `limit` of the most recent messages. Returns how many were removed. */
    async fn bulk_delete(&self, limit: u64) -> Result<usize, PlatformError>;

    async fn send(&self, message: &StatsMessage) -> Result<(), PlatformError>;
}

/// Receiver of membership change notifications. The gateway handler holds exactly one.
#[async_trait]
pub trait MembershipSink: Send + Sync {
    async fn membership_changed(&self);
}

#[async_trait]
impl<T: MembershipSource + ?Sized> MembershipSource for Arc<T> {
    async fn snapshot(&self) -> Result<MembershipSnapshot, PlatformError> {
        (**self).snapshot().await
    }
}

#[async_trait]
impl<T: StatsChannel + ?Sized> StatsChannel for Arc<T> {
    async fn bulk_delete(&self, limit: u64) -> Result<usize, PlatformError> {
        (**self).bulk_delete(limit).await
    }

    async fn send(&self, message: &StatsMessage) -> Result<(), PlatformError> {
        (**self).send(message).await
    }
}
