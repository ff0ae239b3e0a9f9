use crate::error::Result;
use crate::history::{HistoryConfig, QueryStatus, RunId};
use crate::PAGE_SIZE;
use querylens_store::{
    Page, QueryMetadata, ResultSetSchema, ResultStore, SortSpec, StoreInfo,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Where one evaluation's artifacts live. The paths are handed to the
/// engine verbatim; their contents are never parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPaths {
    pub results: PathBuf,
    pub sorted_results: PathBuf,
    pub interpreted_results: PathBuf,
}

impl ResultsPaths {
    pub fn new(results: PathBuf, sorted_results: PathBuf, interpreted_results: PathBuf) -> Self {
        Self {
            results,
            sorted_results,
            interpreted_results,
        }
    }

    /// Derives sibling artifact paths next to the raw results file.
    pub fn for_results(results: PathBuf) -> Self {
        let sorted_results = results.with_extension("sorted.qres");
        let interpreted_results = results.with_extension("sarif");
        Self {
            results,
            sorted_results,
            interpreted_results,
        }
    }
}

/// Everything known about an evaluation when it completes.
pub struct QueryInfo {
    pub run_id: RunId,
    pub query_name: String,
    pub database_name: String,
    /// Completion time, preformatted for display.
    pub time: String,
    pub metadata: Option<QueryMetadata>,
    pub paths: ResultsPaths,
}

/// The sorted projection currently materialized on disk, if any. Owned
/// exclusively by its query's sort lock.
struct SortedProjection {
    result_set: String,
    spec: SortSpec,
    info: StoreInfo,
}

/// One completed evaluation: the unit pages are served from.
///
/// Sorting is serialized through `sorted`: the lock acquisition is the only
/// suspension point callers queue on, at most one materialization is in
/// flight per query, and everyone asking for the cached `(set, spec)` pair
/// reuses the projection without engine work. A failed materialization
/// surfaces to the caller that triggered it and releases the lock on the
/// way out.
pub struct CompletedQuery {
    info: QueryInfo,
    status: QueryStatus,
    header: Option<StoreInfo>,
    label: Option<String>,
    sorted: Mutex<Option<SortedProjection>>,
}

/// Fetches the result-store header for a finished evaluation. Evaluations
/// that did not succeed have no header, and every page request against them
/// answers "no such page".
pub async fn results_header(
    store: &dyn ResultStore,
    status: &QueryStatus,
    paths: &ResultsPaths,
) -> Result<Option<StoreInfo>> {
    if !status.is_success() {
        return Ok(None);
    }
    Ok(Some(store.info(&paths.results, PAGE_SIZE).await?))
}

impl CompletedQuery {
    pub fn new(info: QueryInfo, status: QueryStatus, header: Option<StoreInfo>) -> Self {
        Self {
            info,
            status,
            header,
            label: None,
            sorted: Mutex::new(None),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.info.run_id
    }

    pub fn query_name(&self) -> &str {
        &self.info.query_name
    }

    pub fn database_name(&self) -> &str {
        &self.info.database_name
    }

    pub fn metadata(&self) -> Option<&QueryMetadata> {
        self.info.metadata.as_ref()
    }

    pub fn paths(&self) -> &ResultsPaths {
        &self.info.paths
    }

    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn header(&self) -> Option<&StoreInfo> {
        self.header.as_ref()
    }

    /// Whether this query can produce interpreted results at all.
    pub fn can_interpret(&self) -> bool {
        self.info.metadata.is_some()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// The user-visible label: the per-entry override when set, otherwise
    /// the configured format interpolated.
    pub fn label(&self, config: &HistoryConfig) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.interpolate(&config.format),
        }
    }

    /// Expands `%t` time, `%q` query name, `%d` database name, `%s` status
    /// and `%%`; any other `%` sequence is kept verbatim.
    pub fn interpolate(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some('t') => out.push_str(&self.info.time),
                Some('q') => out.push_str(&self.info.query_name),
                Some('d') => out.push_str(&self.info.database_name),
                Some('s') => out.push_str(&self.status.to_string()),
                Some('%') => out.push('%'),
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        out
    }

    /// Serves one page of `result_set`, in natural order or under `sort`.
    ///
    /// `Ok(None)` means there is no such page: the evaluation has no
    /// header, the set is unknown, the set has no pagination index, or the
    /// page number is past the end. Those tell a paginating caller to stop;
    /// engine failures are errors.
    pub async fn get_page(
        &self,
        store: &dyn ResultStore,
        result_set: &str,
        page: usize,
        sort: Option<&SortSpec>,
    ) -> Result<Option<Page>> {
        if self.header.is_none() {
            return Ok(None);
        }
        match sort {
            None => {
                let schema = self.header.as_ref().and_then(|h| h.result_set(result_set));
                let Some(offset) = page_offset(schema, page) else {
                    return Ok(None);
                };
                let page = store
                    .decode_page(&self.info.paths.results, result_set, PAGE_SIZE, offset)
                    .await?;
                Ok(Some(page))
            }
            Some(spec) => {
                let mut sorted = self.sorted.lock().await;
                let cached = matches!(
                    &*sorted,
                    Some(projection)
                        if projection.result_set == result_set && projection.spec == *spec
                );
                if !cached {
                    if sorted.take().is_some() {
                        discard_artifact(&self.info.paths.sorted_results).await?;
                    }
                    store
                        .sort(
                            &self.info.paths.results,
                            &self.info.paths.sorted_results,
                            result_set,
                            &[spec.column_index],
                            &[spec.direction],
                        )
                        .await?;
                    let info = store
                        .info(&self.info.paths.sorted_results, PAGE_SIZE)
                        .await?;
                    log::debug!(
                        "materialized sort of {result_set} by column {} for {}",
                        spec.column_index,
                        self.info.query_name,
                    );
                    *sorted = Some(SortedProjection {
                        result_set: result_set.to_string(),
                        spec: *spec,
                        info,
                    });
                }
                // The sorted artifact holds exactly the one re-sorted set.
                let schema = sorted
                    .as_ref()
                    .and_then(|projection| projection.info.result_sets.first());
                let Some(offset) = page_offset(schema, page) else {
                    return Ok(None);
                };
                let page = store
                    .decode_page(
                        &self.info.paths.sorted_results,
                        result_set,
                        PAGE_SIZE,
                        offset,
                    )
                    .await?;
                Ok(Some(page))
            }
        }
    }
}

fn page_offset(schema: Option<&ResultSetSchema>, page: usize) -> Option<u64> {
    schema?.pagination.as_ref()?.offsets.get(page).copied()
}

async fn discard_artifact(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
