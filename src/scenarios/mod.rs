//! Traffic scenarios
//!
//! Each task is a thin adapter over the traversal engine: it picks the
//! endpoint family, the visitor, and the events to emit.
//!
//! # Overview
//!
//! - [`Task`] - the task registry, selected by name
//! - [`ScenarioContext`] - client, config and retry policy of one run
//! - [`run_task`] - dispatch

mod create;
mod motels;
mod reservations;

pub use create::{post_motel_chain, post_motel_from_chain, seed_motel_rooms, seed_room_categories};
pub use motels::{
    chain_lookup, get_motel_chains, get_motel_rooms, get_motels, get_motels_count,
    get_room_categories, motel_chain_name,
};
pub use reservations::{
    reservation_all_bookings, reservation_all_motels, reservation_by_ids,
    reservation_from_availability,
};

use crate::config::ScenarioConfig;
use crate::count::CountSummary;
use crate::engine::{PageSource, TraversalEngine, TraversalReport};
use crate::error::{Error, Result};
use crate::health::{self, LoopSummary, PingStatus};
use crate::http::HttpClient;
use crate::pagination::PagePlan;
use crate::retry::RetryPolicy;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Context
// ============================================================================

/// Everything a scenario needs, built once by the CLI
#[derive(Debug)]
pub struct ScenarioContext {
    pub client: HttpClient,
    pub config: ScenarioConfig,
    pub retry: RetryPolicy,
    /// Run length of the loop tasks
    pub duration: Duration,
    /// Pause between loop iterations
    pub interval: Duration,
}

impl ScenarioContext {
    pub fn new(client: HttpClient, config: ScenarioConfig) -> Self {
        Self {
            client,
            config,
            retry: RetryPolicy::default(),
            duration: Duration::from_secs(60),
            interval: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Motel API paging: `?page=0&size=N`
    pub fn motel_plan(&self) -> PagePlan {
        PagePlan::offset(self.config.page_size)
    }

    /// Reservation API paging: `?page=1&per_page=N` unless configured otherwise
    pub fn reservation_plan(&self) -> PagePlan {
        let r = &self.config.reservations;
        PagePlan::cursor(r.per_page)
            .with_params(r.page_param.clone(), r.per_page_param.clone())
            .starting_at(r.start_page)
    }

    /// Engine over `source` sharing this context's retry policy
    pub fn engine<'a>(&self, source: &'a dyn PageSource, plan: PagePlan) -> TraversalEngine<'a> {
        TraversalEngine::new(source, plan).with_retry(self.retry.clone())
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Every runnable task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    PingOnce,
    PingLoop,
    ReservationPingOnce,
    ReservationPingLoop,
    GetMotelChains,
    GetMotels,
    GetMotelRooms,
    GetRoomCategories,
    GetMotelsCount,
    PostMotelChain,
    PostMotelFromChain,
    SeedRoomCategories,
    SeedMotelRooms,
    ReservationAllMotels,
    ReservationAllBookings,
    ReservationByIds,
    ReservationFromAvailability,
}

impl Task {
    pub const ALL: &'static [Task] = &[
        Task::PingOnce,
        Task::PingLoop,
        Task::ReservationPingOnce,
        Task::ReservationPingLoop,
        Task::GetMotelChains,
        Task::GetMotels,
        Task::GetMotelRooms,
        Task::GetRoomCategories,
        Task::GetMotelsCount,
        Task::PostMotelChain,
        Task::PostMotelFromChain,
        Task::SeedRoomCategories,
        Task::SeedMotelRooms,
        Task::ReservationAllMotels,
        Task::ReservationAllBookings,
        Task::ReservationByIds,
        Task::ReservationFromAvailability,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Task::PingOnce => "ping_once",
            Task::PingLoop => "ping_loop",
            Task::ReservationPingOnce => "reservation_ping_once",
            Task::ReservationPingLoop => "reservation_ping_loop",
            Task::GetMotelChains => "get_motel_chains",
            Task::GetMotels => "get_motels",
            Task::GetMotelRooms => "get_motel_rooms",
            Task::GetRoomCategories => "get_room_categories",
            Task::GetMotelsCount => "get_motels_count",
            Task::PostMotelChain => "post_motel_chain",
            Task::PostMotelFromChain => "post_motel_from_chain",
            Task::SeedRoomCategories => "seed_room_categories",
            Task::SeedMotelRooms => "seed_motel_rooms",
            Task::ReservationAllMotels => "reservation_all_motels",
            Task::ReservationAllBookings => "reservation_all_bookings",
            Task::ReservationByIds => "reservation_by_ids",
            Task::ReservationFromAvailability => "reservation_from_availability",
        }
    }

    /// Comma-separated list of valid names
    pub fn valid_names() -> String {
        Task::ALL
            .iter()
            .map(Task::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Task::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| Error::UnknownTask {
                task: wanted.to_string(),
                valid: Task::valid_names(),
            })
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// What a task produced
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Ping(PingStatus),
    PingLoop(LoopSummary),
    Counts(CountSummary),
    /// Reply of a single creation
    Created(Value),
    Traversal(TraversalReport),
    /// Search over a paginated source followed by one dependent call
    Search {
        search: TraversalReport,
        found: bool,
        emitted: u64,
        failed: u64,
    },
}

/// Run one task to completion
pub async fn run_task(task: Task, ctx: &ScenarioContext) -> Result<TaskOutcome> {
    let client = &ctx.client;
    let retry = &ctx.retry;

    match task {
        Task::PingOnce => health::check_motel_ping(client, retry)
            .await
            .map(TaskOutcome::Ping),
        Task::PingLoop => Ok(TaskOutcome::PingLoop(
            health::run_loop(ctx.duration, ctx.interval, "ping_error", || {
                health::check_motel_ping(client, retry)
            })
            .await,
        )),
        Task::ReservationPingOnce => health::check_reservation_ping(client, retry)
            .await
            .map(TaskOutcome::Ping),
        Task::ReservationPingLoop => Ok(TaskOutcome::PingLoop(
            health::run_loop(ctx.duration, ctx.interval, "reservation_ping_error", || {
                health::check_reservation_ping(client, retry)
            })
            .await,
        )),
        Task::GetMotelChains => get_motel_chains(ctx).await.map(TaskOutcome::Traversal),
        Task::GetMotels => get_motels(ctx).await.map(TaskOutcome::Traversal),
        Task::GetMotelRooms => get_motel_rooms(ctx).await.map(TaskOutcome::Traversal),
        Task::GetRoomCategories => get_room_categories(ctx).await.map(TaskOutcome::Traversal),
        Task::GetMotelsCount => get_motels_count(ctx).await.map(TaskOutcome::Counts),
        Task::PostMotelChain => post_motel_chain(ctx).await.map(TaskOutcome::Created),
        Task::PostMotelFromChain => post_motel_from_chain(ctx).await.map(TaskOutcome::Traversal),
        Task::SeedRoomCategories => seed_room_categories(ctx).await.map(TaskOutcome::Traversal),
        Task::SeedMotelRooms => seed_motel_rooms(ctx).await.map(TaskOutcome::Traversal),
        Task::ReservationAllMotels => reservation_all_motels(ctx).await.map(TaskOutcome::Traversal),
        Task::ReservationAllBookings => {
            reservation_all_bookings(ctx).await.map(TaskOutcome::Traversal)
        }
        Task::ReservationByIds => reservation_by_ids(ctx).await,
        Task::ReservationFromAvailability => reservation_from_availability(ctx).await,
    }
}
