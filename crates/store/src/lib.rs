//! # QueryLens Store
//!
//! The contract with the result-store engine: the external process that
//! owns the binary result files a query evaluation produces. The engine
//! can describe a file (`info`), decode one page of one result set
//! (`decode_page`), write a re-sorted copy (`sort`), and interpret raw
//! results into a SARIF log (`interpret`).
//!
//! Everything behind [`ResultStore`] is asynchronous and fallible; the
//! transport is the implementation's business. Offsets and artifact paths
//! handed out by the engine are opaque identifiers and are never parsed
//! here.
//!
//! Two implementations ship with the crate:
//!
//! - [`EngineClient`] spawns a configured engine binary per call and reads
//!   JSON from its stdout, and
//! - [`MemoryStore`], an in-process engine for tests and tooling that keeps
//!   result sets as plain rows.

mod engine;
mod error;
mod memory;
mod types;

use async_trait::async_trait;
use querylens_sarif::Log;
use std::path::Path;

pub use engine::EngineClient;
pub use error::{Result, StoreError};
pub use memory::{MemoryStore, MemoryTable};
pub use types::{
    CellValue, Column, ColumnKind, EntityValue, Page, Pagination, QueryMetadata, ResultSetSchema,
    SortDirection, SortSpec, SourceInfo, StoreInfo,
};

/// The result-store engine boundary.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Describes the result sets in `results`, with pagination indexed for
    /// pages of `page_size` rows.
    async fn info(&self, results: &Path, page_size: usize) -> Result<StoreInfo>;

    /// Decodes one page of `result_set`, starting at `offset` from the
    /// set's pagination index.
    async fn decode_page(
        &self,
        results: &Path,
        result_set: &str,
        page_size: usize,
        offset: u64,
    ) -> Result<Page>;

    /// Writes a copy of `result_set` sorted by `columns`/`directions` to
    /// `dest`.
    async fn sort(
        &self,
        results: &Path,
        dest: &Path,
        result_set: &str,
        columns: &[usize],
        directions: &[SortDirection],
    ) -> Result<()>;

    /// Interprets raw results into a SARIF log, writing it to `output` as a
    /// side effect.
    async fn interpret(
        &self,
        metadata: &QueryMetadata,
        results: &Path,
        output: &Path,
        source: Option<&SourceInfo>,
    ) -> Result<Log>;
}
