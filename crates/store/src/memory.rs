use crate::error::{Result, StoreError};
use crate::types::{
    CellValue, Column, Page, Pagination, QueryMetadata, ResultSetSchema, SortDirection, SourceInfo,
    StoreInfo,
};
use crate::ResultStore;
use async_trait::async_trait;
use querylens_sarif::Log;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

/// One named result set held in memory.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

/// An in-process result store.
///
/// Pages are served straight from row vectors; the "offsets" handed out in
/// pagination indexes are plain row indices, which exercises the rule that
/// offsets are opaque to everything but the engine that issued them.
/// Besides being the test double for every coordinator test, it backs
/// tooling that wants the paging semantics without an engine binary.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<MemoryTable>>>,
    interpretations: Mutex<HashMap<PathBuf, Log>>,
    sort_calls: AtomicUsize,
    fail_next_sort: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_results(&self, path: impl Into<PathBuf>, tables: Vec<MemoryTable>) {
        self.files
            .lock()
            .expect("memory store poisoned")
            .insert(path.into(), tables);
    }

    pub fn add_interpretation(&self, path: impl Into<PathBuf>, log: Log) {
        self.interpretations
            .lock()
            .expect("memory store poisoned")
            .insert(path.into(), log);
    }

    /// Number of `sort` calls served so far, including failed ones.
    pub fn sort_calls(&self) -> usize {
        self.sort_calls.load(AtomicOrdering::SeqCst)
    }

    /// Makes the next `sort` call fail with an engine error.
    pub fn fail_next_sort(&self) {
        self.fail_next_sort.store(true, AtomicOrdering::SeqCst);
    }

    fn tables(&self, results: &Path) -> Result<Vec<MemoryTable>> {
        self.files
            .lock()
            .expect("memory store poisoned")
            .get(results)
            .cloned()
            .ok_or_else(|| StoreError::UnknownResults(results.to_path_buf()))
    }

    fn table(&self, results: &Path, result_set: &str) -> Result<MemoryTable> {
        self.tables(results)?
            .into_iter()
            .find(|table| table.name == result_set)
            .ok_or_else(|| StoreError::Engine {
                code: Some(2),
                stderr: format!("no result set {result_set}"),
            })
    }
}

fn cell_ordering(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
        (CellValue::Float(a), CellValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (CellValue::Integer(a), CellValue::Float(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (CellValue::Float(a), CellValue::Integer(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }
        (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
        (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
        (CellValue::Entity(a), CellValue::Entity(b)) => a.label.cmp(&b.label),
        // Mixed kinds should not happen in a well-typed column; keep the
        // original order.
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn info(&self, results: &Path, page_size: usize) -> Result<StoreInfo> {
        let tables = self.tables(results)?;
        let result_sets = tables
            .into_iter()
            .map(|table| ResultSetSchema {
                name: table.name,
                rows: table.rows.len(),
                columns: table.columns,
                pagination: Some(Pagination {
                    step_size: page_size,
                    offsets: (0..table.rows.len())
                        .step_by(page_size.max(1))
                        .map(|row| row as u64)
                        .collect(),
                }),
            })
            .collect();
        Ok(StoreInfo { result_sets })
    }

    async fn decode_page(
        &self,
        results: &Path,
        result_set: &str,
        page_size: usize,
        offset: u64,
    ) -> Result<Page> {
        let table = self.table(results, result_set)?;
        let start = (offset as usize).min(table.rows.len());
        let end = start.saturating_add(page_size).min(table.rows.len());
        Ok(Page {
            tuples: table.rows[start..end].to_vec(),
            next: (end < table.rows.len()).then_some(end as u64),
        })
    }

    async fn sort(
        &self,
        results: &Path,
        dest: &Path,
        result_set: &str,
        columns: &[usize],
        directions: &[SortDirection],
    ) -> Result<()> {
        self.sort_calls.fetch_add(1, AtomicOrdering::SeqCst);
        // An engine call always suspends; let concurrent callers reach the
        // coordinator while this sort is "in flight".
        tokio::task::yield_now().await;
        if self.fail_next_sort.swap(false, AtomicOrdering::SeqCst) {
            return Err(StoreError::Engine {
                code: Some(1),
                stderr: "sort failed".to_string(),
            });
        }
        let mut table = self.table(results, result_set)?;
        table.rows.sort_by(|left, right| {
            for (column, direction) in columns.iter().zip(directions) {
                let ordering = match (left.get(*column), right.get(*column)) {
                    (Some(a), Some(b)) => cell_ordering(a, b),
                    _ => Ordering::Equal,
                };
                let ordering = match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        self.files
            .lock()
            .expect("memory store poisoned")
            .insert(dest.to_path_buf(), vec![table]);
        Ok(())
    }

    async fn interpret(
        &self,
        _metadata: &QueryMetadata,
        results: &Path,
        output: &Path,
        _source: Option<&SourceInfo>,
    ) -> Result<Log> {
        let log = self
            .interpretations
            .lock()
            .expect("memory store poisoned")
            .get(results)
            .cloned()
            .ok_or_else(|| StoreError::Engine {
                code: Some(2),
                stderr: format!("no interpretation for {}", results.display()),
            })?;
        tokio::fs::write(output, serde_json::to_vec(&log)?).await?;
        Ok(log)
    }
}
