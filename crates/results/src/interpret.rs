use crate::error::{Result, ResultsError};
use crate::query::ResultsPaths;
use querylens_sarif::Log;
use querylens_store::{QueryMetadata, ResultStore, SourceInfo};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

/// An interpreted ("alerts") view of a query's results, bounded for
/// consumption by a single rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Path prefix the analysis ran under; relative SARIF uris resolve
    /// against it.
    pub source_location_prefix: String,
    /// How many results were dropped to stay under the per-run cap.
    pub num_truncated_results: usize,
    pub log: Log,
}

impl Interpretation {
    /// Caps every run of `log` at `cap` results, keeping each run's prefix
    /// in the engine's own order and accounting for everything dropped.
    pub fn truncated(mut log: Log, source_location_prefix: impl Into<String>, cap: usize) -> Self {
        let mut num_truncated_results = 0;
        for run in &mut log.runs {
            if let Some(results) = &mut run.results {
                if results.len() > cap {
                    num_truncated_results += results.len() - cap;
                    results.truncate(cap);
                }
            }
        }
        Self {
            source_location_prefix: source_location_prefix.into(),
            num_truncated_results,
            log,
        }
    }
}

/// Obtains the interpreted log for an evaluation.
///
/// A previously interpreted log cached at `paths.interpreted_results` is
/// reused as is. Otherwise the query metadata must at least carry a result
/// kind; interpretation without one is impossible, though the raw results
/// stay viewable. A missing id is substituted with a placeholder since the
/// output format demands one.
pub async fn interpret(
    store: &dyn ResultStore,
    metadata: Option<&QueryMetadata>,
    paths: &ResultsPaths,
    source: Option<&SourceInfo>,
) -> Result<Log> {
    match tokio::fs::read(&paths.interpreted_results).await {
        Ok(raw) => {
            log::debug!(
                "reusing interpreted results at {}",
                paths.interpreted_results.display()
            );
            return Ok(serde_json::from_slice(&raw)?);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    let metadata = metadata.ok_or(ResultsError::MissingMetadata("metadata"))?;
    let kind = metadata
        .kind
        .clone()
        .ok_or(ResultsError::MissingMetadata("kind"))?;
    let id = metadata
        .id
        .clone()
        .unwrap_or_else(|| "dummy-id".to_string());
    let metadata = QueryMetadata {
        kind: Some(kind),
        id: Some(id),
        ..metadata.clone()
    };
    Ok(store
        .interpret(&metadata, &paths.results, &paths.interpreted_results, source)
        .await?)
}

/// Interprets and truncates in one step: what alert consumers want.
pub async fn interpretation(
    store: &dyn ResultStore,
    metadata: Option<&QueryMetadata>,
    paths: &ResultsPaths,
    source: Option<&SourceInfo>,
    source_location_prefix: &str,
    cap: usize,
) -> Result<Interpretation> {
    let log = interpret(store, metadata, paths, source).await?;
    Ok(Interpretation::truncated(log, source_location_prefix, cap))
}
