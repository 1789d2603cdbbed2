// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Motel Traffic
//!
//! Synthetic traffic for the motel inventory and reservation REST APIs:
//! paginated crawls, chain-name enrichment, and bounded, count-guarded
//! creation batches.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use motel_traffic::http::{HttpClient, HttpClientConfig};
//! use motel_traffic::scenarios::{run_task, ScenarioContext, Task};
//! use motel_traffic::ScenarioConfig;
//!
//! #[tokio::main]
//! async fn main() -> motel_traffic::Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("http://localhost:8080")
//!         .build();
//!     let ctx = ScenarioContext::new(HttpClient::with_config(config)?, ScenarioConfig::default());
//!
//!     let task: Task = "get_motels".parse()?;
//!     let outcome = run_task(task, &ctx).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Scenarios                               │
//! │  ping · get_* crawls · post_* / seed_* batches · reservation_*  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Engine  │ Envelope  │  Pagination   │   Guard   │ Enrichment  │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Traverse │ content   │ Offset        │ Count     │ Chain id →  │
//! │ Visit    │ data list │ Cursor        │ Ceiling   │ chain name  │
//! │ Create   │ data.data │ Loop guard    │ Fail open │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//!                                │
//!                HTTP client · retry · rate limit
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with rate limiting
pub mod http;

/// Transient-failure retries with exponential backoff
pub mod retry;

/// Response envelope extraction
pub mod envelope;

/// Pagination schemas and the cursor
pub mod pagination;

/// Traversal-and-mutate engine
pub mod engine;

/// Count-ceiling gate
pub mod guard;

/// Table counts
pub mod count;

/// Id → name lookups
pub mod enrichment;

/// Creation payloads
pub mod generators;

/// Ping health checks
pub mod health;

/// Settings and scenario configuration
pub mod config;

/// Traffic tasks
pub mod scenarios;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ScenarioConfig, Settings};
pub use error::{Error, Result};
pub use scenarios::{run_task, ScenarioContext, Task, TaskOutcome};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
