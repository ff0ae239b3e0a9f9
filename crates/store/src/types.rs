use querylens_locations::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Column value kinds a result set can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: ColumnKind,
}

/// Page-number → offset index for one result set. Offsets are opaque to
/// everything but the engine that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub step_size: usize,
    pub offsets: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSetSchema {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<Column>,
    /// Absent when the engine did not index this set for paging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// The header an `info` call returns: one schema per result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub result_sets: Vec<ResultSetSchema>,
}

impl StoreInfo {
    pub fn result_set(&self, name: &str) -> Option<&ResultSetSchema> {
        self.result_sets.iter().find(|set| set.name == name)
    }
}

/// A value that names a program element, usually with a location to jump
/// to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// One cell of a decoded result tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Entity(EntityValue),
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Entity(entity) => write!(f, "{}", entity.label.as_deref().unwrap_or("")),
            CellValue::String(value) => write!(f, "{value}"),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// One fixed-size page of rows. Only the final page of a set may be short.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub tuples: Vec<Vec<CellValue>>,
    /// Offset of the page after this one, when the engine knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A request to order a result set by one column. Equality is structural,
/// and is what decides whether a cached sorted artifact can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column_index: usize,
    pub direction: SortDirection,
}

/// Metadata attached to the query that produced a result store. All fields
/// are optional at this level; interpretation has its own requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Where interpreted locations live: the archived source tree and the path
/// prefix the analysis ran under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub source_archive: PathBuf,
    pub source_location_prefix: String,
}
