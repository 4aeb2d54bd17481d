//! # curlback
//!
//! A terminal browser for captured HTTP request profiles. Records are
//! addressed by opaque tokens; the tool lists and filters them, shows one
//! request's full detail, and regenerates a replayable curl command line
//! for one record or the whole listing.
//!
//! ## Architecture
//! Layered, single-threaded:
//! - Storage layer - file-backed profile store behind a query trait,
//!   wrapped by an adapter that normalizes raw captures
//! - Presentation layer - record table, detail view, menu, styled lines
//! - App layer - session state machine: one-shot flag dispatch and the
//!   interactive keystroke loop with cooperative cancellation

pub mod app;
pub mod cli;
pub mod constants;
pub mod curl;
pub mod export;
pub mod input;
pub mod models;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{Session, SessionEnd, SessionState};
pub use curl::render_curl;
pub use export::{ExportOutcome, Exporter};
pub use input::{CancelFlag, InputSource, Key, TerminalInput};
pub use models::{FilterCriteria, RecordDetail, RecordSummary};
pub use storage::{FileStore, ProfileStore, RecordStore};
