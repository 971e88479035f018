//! Agent Log Analytics - usage analytics over local AI coding assistant transcripts
//!
//! This library reads the transcript files that Claude Code, Codex, and Cursor
//! leave on disk and turns them into one aggregated usage summary:
//!
//! - Discovering transcript files under each assistant's data directory
//! - Parsing the three on-disk formats and normalizing them into [`Conversation`]s
//! - Aggregating tool usage, prompt shape, conversation flow, and activity
//! - Deriving workflow recommendations from the aggregates
//! - Profiling which fields each source actually carries
//! - Caching the result in a generation store keyed by a source fingerprint
//!
//! # Example
//!
//! ```no_run
//! use agent_log_analytics::{SourceConfig, compute_summary, load_conversations};
//!
//! let config = SourceConfig::from_env()?;
//! let conversations = load_conversations(&config)?;
//! let summary = compute_summary(&conversations);
//! println!("{} conversations", summary.overview.total_conversations);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod indexer;
pub mod models;
pub mod normalizer;
pub mod parsers;
pub mod recommendations;
pub mod schema;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use analytics::{AnalyticsSummary, compute_summary};
pub use config::SourceConfig;
pub use indexer::load_conversations;
pub use models::{Conversation, Platform};
pub use schema::profile_schema;
pub use store::{AnalyticsStore, compute_fingerprint};
pub use utils::paths::{decode_path, format_path_with_tilde};
