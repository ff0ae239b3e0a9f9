use crate::error::Result;
use crate::query::CompletedQuery;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifies one completed evaluation for the lifetime of a session.
pub type RunId = u64;

/// How an evaluation ended. Durations are what the engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum QueryStatus {
    Success { evaluation_ms: u64 },
    Cancelled { evaluation_ms: u64 },
    OutOfMemory,
    Timeout { evaluation_ms: u64 },
    Failed,
}

impl QueryStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryStatus::Success { .. })
    }

    fn seconds(ms: u64) -> f64 {
        ms as f64 / 1000.0
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::Success { evaluation_ms } => {
                write!(f, "finished in {} seconds", Self::seconds(*evaluation_ms))
            }
            QueryStatus::Cancelled { evaluation_ms } => {
                write!(f, "cancelled after {} seconds", Self::seconds(*evaluation_ms))
            }
            QueryStatus::OutOfMemory => write!(f, "out of memory"),
            QueryStatus::Timeout { evaluation_ms } => {
                write!(f, "timed out after {} seconds", Self::seconds(*evaluation_ms))
            }
            QueryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// How history entries are labeled by default. `%q`, `%d`, `%t` and `%s`
/// interpolate the query name, database name, completion time and status;
/// `%%` is a literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub format: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            format: "%q on %d - %t, %s".to_string(),
        }
    }
}

impl HistoryConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_toml(&std::fs::read_to_string(path)?)?)
    }
}

/// The completed evaluations of one session, in completion order, with a
/// notion of the entry the user is looking at.
#[derive(Default)]
pub struct QueryHistory {
    entries: Vec<CompletedQuery>,
    current: Option<RunId>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and makes it current.
    pub fn push(&mut self, query: CompletedQuery) -> RunId {
        let run_id = query.run_id();
        self.current = Some(run_id);
        self.entries.push(query);
        run_id
    }

    pub fn get(&self, run_id: RunId) -> Option<&CompletedQuery> {
        self.entries.iter().find(|entry| entry.run_id() == run_id)
    }

    pub fn get_mut(&mut self, run_id: RunId) -> Option<&mut CompletedQuery> {
        self.entries
            .iter_mut()
            .find(|entry| entry.run_id() == run_id)
    }

    pub fn current(&self) -> Option<&CompletedQuery> {
        self.get(self.current?)
    }

    pub fn set_current(&mut self, run_id: RunId) -> bool {
        if self.get(run_id).is_some() {
            self.current = Some(run_id);
            true
        } else {
            false
        }
    }

    /// Removes an entry. When the removed entry was current, a neighbor
    /// close to the removed index becomes current instead, if any remains.
    pub fn remove(&mut self, run_id: RunId) -> Option<CompletedQuery> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.run_id() == run_id)?;
        let removed = self.entries.remove(index);
        if self.current == Some(run_id) {
            self.current = if self.entries.is_empty() {
                None
            } else {
                Some(self.entries[index.min(self.entries.len() - 1)].run_id())
            };
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletedQuery> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
