use serenity::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use crate::client::platform::{MembershipSink, MembershipSource, PlatformError, StatsChannel};
use crate::client::publisher::ChannelPublisher;
use crate::client::stats::model::RoleConfig;
use crate::client::stats::renderer::render_stats;

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    pending: bool,
}

// Never held across an await, so a plain mutex is enough. A poisoned lock still holds
// consistent flags since every critical section only flips booleans.
fn lock_state(state: &Mutex<RefreshState>) -> MutexGuard<'_, RefreshState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/** Clears the in-flight flags if a refresh unwinds instead of finishing normally. */
struct InFlight<'a> {
    state: &'a Mutex<RefreshState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock_state(self.state);
            state.in_flight = false;
            state.pending = false;
        }
    }
}

/** What a refresh request ended up doing. */
#[derive(Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This request ran the refresh loop itself, `runs` times.
    Completed { runs: usize },
    /// A refresh was already in flight; it will run once more after it finishes.
    Coalesced,
}

/// Keeps the stats channel in sync with guild membership.
///
/// At most one refresh is in flight. Requests that arrive meanwhile collapse into a single
/// pending refresh, which the in-flight request runs against a fresh snapshot once it is done.
pub struct RefreshController<S, C> {
    source: S,
    publisher: ChannelPublisher<C>,
    roles: RoleConfig,
    state: Mutex<RefreshState>,
}

impl<S: MembershipSource, C: StatsChannel> RefreshController<S, C> {
    pub fn new(source: S, publisher: ChannelPublisher<C>, roles: RoleConfig) -> Self {
        RefreshController {
            source,
            publisher,
            roles,
            state: Mutex::new(RefreshState::default()),
        }
    }

    pub async fn request_refresh(&self) -> RefreshOutcome {
        {
            let mut state = lock_state(&self.state);
            if state.in_flight {
                state.pending = true;
                debug!("Refresh already running, coalescing request");
                return RefreshOutcome::Coalesced;
            }
            state.in_flight = true;
        }

        let mut in_flight = InFlight {
            state: &self.state,
            armed: true,
        };
        let mut runs = 0;
        loop {
            runs += 1;
            match self.refresh_once().await {
                Ok(()) => info!("Stats message refreshed"),
                Err(why) => error!("Stats refresh failed: {}", why),
            }

            let mut state = lock_state(&self.state);
            if !state.pending {
                state.in_flight = false;
                in_flight.disarm();
                break;
            }
            state.pending = false;
        }
        debug!("Refresh loop finished after {} run(s)", runs);
        RefreshOutcome::Completed { runs }
    }

    async fn refresh_once(&self) -> Result<(), PlatformError> {
        let snapshot = self.source.snapshot().await?;
        let summary = render_stats(&self.roles, &snapshot);
        debug!(
            "Rendered stats for {} human member(s)",
            summary.total_human_members
        );
        self.publisher.publish(&summary, &snapshot.guild_name).await
    }
}

#[async_trait]
impl<S: MembershipSource, C: StatsChannel> MembershipSink for RefreshController<S, C> {
    async fn membership_changed(&self) {
        self.request_refresh().await;
    }
}
