use serde::{Deserialize, Serialize};

/// A source location as reported by the analysis engine.
///
/// Line and column numbers are 1-based and inclusive at both ends, which is
/// the engine's convention, not the editor's. See [`crate::resolve`] for the
/// conversion into 0-based half-open ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Location {
    /// A precise span: file plus 1-based inclusive line/column endpoints.
    LineColumn {
        uri: String,
        line_start: u32,
        col_start: u32,
        line_end: u32,
        col_end: u32,
    },
    /// An entire filesystem resource, with no span inside it.
    WholeFile { uri: String },
    /// A byte range. The engine can produce these but this viewer cannot
    /// turn them into an editor range.
    OffsetLength { uri: String, offset: u64, length: u64 },
    /// An unstructured location string.
    Opaque { value: String },
}

/// The subset of [`Location`] that can be resolved against a source
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ResolvableLocation {
    LineColumn {
        uri: String,
        line_start: u32,
        col_start: u32,
        line_end: u32,
        col_end: u32,
    },
    WholeFile { uri: String },
}

impl Location {
    /// Downgrades this location to its resolvable subset, if possible.
    ///
    /// Returns `Some` iff the location is `LineColumn` or `WholeFile` with a
    /// non-empty uri. Never fails; absence is the answer, not an error.
    pub fn resolvable(&self) -> Option<ResolvableLocation> {
        match self {
            Location::LineColumn {
                uri,
                line_start,
                col_start,
                line_end,
                col_end,
            } if !uri.is_empty() => Some(ResolvableLocation::LineColumn {
                uri: uri.clone(),
                line_start: *line_start,
                col_start: *col_start,
                line_end: *line_end,
                col_end: *col_end,
            }),
            Location::WholeFile { uri } if !uri.is_empty() => {
                Some(ResolvableLocation::WholeFile { uri: uri.clone() })
            }
            _ => None,
        }
    }

    /// The uri carried by this location, if it has one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Location::LineColumn { uri, .. }
            | Location::WholeFile { uri }
            | Location::OffsetLength { uri, .. } => Some(uri),
            Location::Opaque { .. } => None,
        }
    }
}

impl ResolvableLocation {
    pub fn uri(&self) -> &str {
        match self {
            ResolvableLocation::LineColumn { uri, .. } | ResolvableLocation::WholeFile { uri } => {
                uri
            }
        }
    }
}
