//! In-process generation store
//!
//! A refresh fingerprints the source trees and rebuilds only when the
//! fingerprint moved. Each build produces an immutable [`Generation`] that
//! replaces the previous one wholesale.

pub mod fingerprint;
pub mod generation;

pub use fingerprint::{FileStamp, compute_fingerprint, fingerprint_stamps};
pub use generation::{AnalyticsStore, Generation, GenerationId};
