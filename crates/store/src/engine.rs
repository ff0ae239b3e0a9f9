use crate::error::{Result, StoreError};
use crate::types::{Page, QueryMetadata, SortDirection, SourceInfo, StoreInfo};
use crate::ResultStore;
use async_trait::async_trait;
use querylens_sarif::Log;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// A result store backed by an external engine binary.
///
/// Every call spawns one short-lived process with `--format=json` and
/// parses its stdout. A non-zero exit becomes [`StoreError::Engine`] with
/// the captured stderr.
pub struct EngineClient {
    program: PathBuf,
}

impl EngineClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Vec<u8>> {
        log::debug!("running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program).args(&args).output().await?;
        if !output.status.success() {
            return Err(StoreError::Engine {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

fn info_args(results: &Path, page_size: usize) -> Vec<OsString> {
    vec![
        "info".into(),
        "--format=json".into(),
        format!("--paging-size={page_size}").into(),
        results.into(),
    ]
}

fn decode_args(results: &Path, result_set: &str, page_size: usize, offset: u64) -> Vec<OsString> {
    vec![
        "decode".into(),
        "--format=json".into(),
        format!("--result-set={result_set}").into(),
        format!("--rows={page_size}").into(),
        format!("--start-at={offset}").into(),
        results.into(),
    ]
}

fn sort_args(
    results: &Path,
    dest: &Path,
    result_set: &str,
    columns: &[usize],
    directions: &[SortDirection],
) -> Vec<OsString> {
    let columns = columns
        .iter()
        .map(|column| column.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let directions = directions
        .iter()
        .map(|direction| match direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
        .collect::<Vec<_>>()
        .join(",");
    let mut args: Vec<OsString> = vec![
        "sort".into(),
        format!("--result-set={result_set}").into(),
        format!("--sort-key={columns}").into(),
        format!("--sort-direction={directions}").into(),
    ];
    args.push({
        let mut arg = OsString::from("--output=");
        arg.push(dest);
        arg
    });
    args.push(results.into());
    args
}

fn interpret_args(
    metadata: &QueryMetadata,
    results: &Path,
    output: &Path,
    source: Option<&SourceInfo>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["interpret".into(), "--format=sarif".into()];
    if let Some(kind) = &metadata.kind {
        args.push(format!("--kind={kind}").into());
    }
    if let Some(id) = &metadata.id {
        args.push(format!("--id={id}").into());
    }
    args.push({
        let mut arg = OsString::from("--output=");
        arg.push(output);
        arg
    });
    if let Some(source) = source {
        args.push({
            let mut arg = OsString::from("--source-archive=");
            arg.push(&source.source_archive);
            arg
        });
        args.push(format!("--source-location-prefix={}", source.source_location_prefix).into());
    }
    args.push(results.into());
    args
}

#[async_trait]
impl ResultStore for EngineClient {
    async fn info(&self, results: &Path, page_size: usize) -> Result<StoreInfo> {
        let stdout = self.run(info_args(results, page_size)).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn decode_page(
        &self,
        results: &Path,
        result_set: &str,
        page_size: usize,
        offset: u64,
    ) -> Result<Page> {
        let stdout = self
            .run(decode_args(results, result_set, page_size, offset))
            .await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn sort(
        &self,
        results: &Path,
        dest: &Path,
        result_set: &str,
        columns: &[usize],
        directions: &[SortDirection],
    ) -> Result<()> {
        self.run(sort_args(results, dest, result_set, columns, directions))
            .await?;
        Ok(())
    }

    async fn interpret(
        &self,
        metadata: &QueryMetadata,
        results: &Path,
        output: &Path,
        source: Option<&SourceInfo>,
    ) -> Result<Log> {
        self.run(interpret_args(metadata, results, output, source))
            .await?;
        // The engine writes the log to `output`; stdout only reports progress.
        let raw = tokio::fs::read(output).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
