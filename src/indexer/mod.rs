//! Source discovery and loading
//!
//! # Error Handling Strategy
//!
//! Discovery is best-effort across all roots:
//!
//! - **Missing roots**: A source whose root directory does not exist simply contributes
//!   no files. Users rarely have every assistant installed.
//!
//! - **Resource limits**: Project and file counts are capped. Hitting a cap logs a
//!   warning and keeps what was found instead of aborting the scan.
//!
//! - **Symlinks**: Never followed. Linked project directories and transcripts are
//!   logged and skipped so a scan cannot escape its root.
//!
//! - **Per-file failures**: Delegated to [`builder::normalize_sources`], which skips
//!   unreadable files and reports a summary.

pub mod builder;
pub mod project_discovery;
pub mod session_discovery;

pub use builder::{discover_sources, load_conversations, normalize_sources};
pub use project_discovery::discover_projects;
pub use session_discovery::{discover_codex_sessions, discover_cursor_transcripts};
