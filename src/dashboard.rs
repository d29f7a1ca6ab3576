//! Admin dashboard polling controller

use chrono::{DateTime, Utc};
use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::client::FluxGen;
use crate::error::{ApiError, Result};
use crate::types::{Analytics, HealthStatus};

/// How often the dashboard refreshes both snapshots.
///
/// 60 seconds is the value the dashboard has always shipped with; kept as a
/// single constant so it can be tuned in one place.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Opaque handle for an in-flight fetch, used to fence stale completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Monotonic sequencing for one resource
///
/// Overlapping fetches (a manual refresh racing the poll timer) can complete
/// out of order; only the completion holding the newest ticket is applied.
#[derive(Debug, Default)]
struct FetchSlot {
    issued: u64,
    applied: u64,
}

impl FetchSlot {
    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    fn try_apply(&mut self, ticket: FetchTicket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }
}

/// State behind the admin dashboard
///
/// Holds the latest health and analytics snapshots plus the loading flags
/// the dashboard buttons render. Fetches go through a begin/complete pair so
/// overlapping requests are fenced; the `refresh_*` associated functions
/// wrap the pair around a `Mutex<Dashboard>` shared between the poll loop
/// and the manual buttons.
#[derive(Debug, Default)]
pub struct Dashboard {
    health: Option<HealthStatus>,
    analytics: Option<Analytics>,
    error: Option<ApiError>,
    last_updated: Option<DateTime<Utc>>,
    loading_all: bool,
    loading_health: bool,
    loading_analytics: bool,
    health_slot: FetchSlot,
    analytics_slot: FetchSlot,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully fetched health snapshot
    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    /// Last successfully fetched analytics snapshot
    pub fn analytics(&self) -> Option<&Analytics> {
        self.analytics.as_ref()
    }

    /// Most recent fetch failure, cleared when any fetch starts
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Completion time of the last successful fetch
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// True while a combined refresh is in flight
    pub fn loading_all(&self) -> bool {
        self.loading_all
    }

    /// True while a health fetch is in flight
    pub fn loading_health(&self) -> bool {
        self.loading_health
    }

    /// True while an analytics fetch is in flight
    pub fn loading_analytics(&self) -> bool {
        self.loading_analytics
    }

    // ============ Begin / complete ============

    /// Start a health fetch: raises the loading flag, clears the displayed
    /// error, and returns the ticket the completion must present.
    pub fn begin_health(&mut self) -> FetchTicket {
        self.loading_health = true;
        self.error = None;
        self.health_slot.issue()
    }

    /// Apply a health fetch result
    ///
    /// Stale completions (a newer fetch already applied) are dropped. A
    /// failure keeps the last known snapshot on display next to the error.
    /// The loading flag drops only when the latest issued fetch completes,
    /// so an older completion cannot hide the spinner of one still in
    /// flight.
    pub fn complete_health(&mut self, ticket: FetchTicket, result: Result<HealthStatus>) {
        if self.health_slot.is_latest(ticket) {
            self.loading_health = false;
        }
        if !self.health_slot.try_apply(ticket) {
            debug!("dropping stale health completion {:?}", ticket);
            return;
        }
        match result {
            Ok(health) => {
                self.health = Some(health);
                self.last_updated = Some(Utc::now());
            }
            Err(e) => self.error = Some(e),
        }
    }

    /// Start an analytics fetch; same contract as [`begin_health`](Self::begin_health)
    pub fn begin_analytics(&mut self) -> FetchTicket {
        self.loading_analytics = true;
        self.error = None;
        self.analytics_slot.issue()
    }

    /// Apply an analytics fetch result
    ///
    /// Stale completions are dropped. A failure clears the displayed
    /// analytics, forcing the "unavailable" empty state. As with health,
    /// the loading flag drops only on the latest issued fetch.
    pub fn complete_analytics(&mut self, ticket: FetchTicket, result: Result<Analytics>) {
        if self.analytics_slot.is_latest(ticket) {
            self.loading_analytics = false;
        }
        if !self.analytics_slot.try_apply(ticket) {
            debug!("dropping stale analytics completion {:?}", ticket);
            return;
        }
        match result {
            Ok(analytics) => {
                self.analytics = Some(analytics);
                self.last_updated = Some(Utc::now());
            }
            Err(e) => {
                self.analytics = None;
                self.error = Some(e);
            }
        }
    }

    // ============ Refresh operations ============
    //
    // These take the dashboard behind a lock so a manual refresh can overlap
    // the poll timer. The lock is held only around the begin/complete state
    // transitions, never across a network await; overlapping completions are
    // sorted out by the fetch tickets.

    /// Fetch only the health snapshot (the "Health Check" button)
    pub async fn refresh_health(dashboard: &Mutex<Self>, client: &FluxGen) {
        let ticket = dashboard.lock().await.begin_health();
        let result = client.get_health_status().await;
        dashboard.lock().await.complete_health(ticket, result);
    }

    /// Fetch only the analytics snapshot (the "Analytics" button)
    pub async fn refresh_analytics(dashboard: &Mutex<Self>, client: &FluxGen) {
        let ticket = dashboard.lock().await.begin_analytics();
        let result = client.get_analytics().await;
        dashboard.lock().await.complete_analytics(ticket, result);
    }

    /// Fetch both snapshots concurrently (mount and "Refresh All")
    ///
    /// The two fetches run under one combined loading flag; a failure in one
    /// does not cancel the other.
    pub async fn refresh_all(dashboard: &Mutex<Self>, client: &FluxGen) {
        let (health_ticket, analytics_ticket) = {
            let mut dash = dashboard.lock().await;
            dash.loading_all = true;
            (dash.begin_health(), dash.begin_analytics())
        };

        let (health, analytics) =
            tokio::join!(client.get_health_status(), client.get_analytics());

        let mut dash = dashboard.lock().await;
        dash.complete_health(health_ticket, health);
        dash.complete_analytics(analytics_ticket, analytics);
        dash.loading_all = false;
    }

    /// Drive the dashboard: refresh immediately, then every [`POLL_INTERVAL`]
    ///
    /// Runs until the returned future is dropped; dropping it on teardown is
    /// what stops the timer. Manual refreshes against the same `dashboard`
    /// keep working while this loop runs.
    pub async fn run(dashboard: &Mutex<Self>, client: &FluxGen) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            Self::refresh_all(dashboard, client).await;
        }
    }
}
