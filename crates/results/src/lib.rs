//! # QueryLens Results
//!
//! Access to one completed query evaluation's results: fixed-size pages on
//! demand, mutually exclusive re-sorting against the on-disk store, and the
//! truncated interpretation that feeds alert rendering and diagnostics.
//!
//! ```text
//!             get_page(set, n, None) ───────────> decode one page
//! CompletedQuery
//!             get_page(set, n, Some(spec)) ─┬───> sort lock (FIFO, one
//!                                           │     materialization in
//!                                           │     flight)
//!                                           └───> decode from the sorted
//!                                                 artifact
//! ```
//!
//! The sorted artifact is owned exclusively by its query's coordinator;
//! nobody else reads or writes it. A sort request that matches the cached
//! projection reuses it without touching the engine.

mod error;
mod history;
mod interpret;
mod query;

pub use error::{Result, ResultsError};
pub use history::{HistoryConfig, QueryHistory, QueryStatus, RunId};
pub use interpret::{interpret, interpretation, Interpretation};
pub use query::{results_header, CompletedQuery, QueryInfo, ResultsPaths};

/// Rows per page, everywhere. Decoding never returns more than this, and
/// only the final page of a set may return fewer.
pub const PAGE_SIZE: usize = 100;

/// Only ever surface this many interpreted results per run to any single
/// consumer.
pub const ALERTS_PER_RUN_LIMIT: usize = 100;
