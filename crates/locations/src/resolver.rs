use crate::location::ResolvableLocation;
use crate::range::{Position, Range, ResolvedLocation};
use crate::snapshot::SourceSnapshot;

/// Resolves a classified location against a source snapshot.
///
/// `Range` is half-open and 0-based; engine locations are closed intervals
/// and 1-based. Start line/column and end line are adjusted with
/// `max(0, v - 1)`; the end column is already exclusive under the engine's
/// convention and is left as is. Whole-file locations resolve to the empty
/// range at the start of the file.
///
/// Returns `None` when the snapshot has no file for the location's uri.
/// This function never fails.
pub fn resolve(
    loc: &ResolvableLocation,
    snapshot: &dyn SourceSnapshot,
) -> Option<ResolvedLocation> {
    let (uri, range) = match loc {
        ResolvableLocation::LineColumn {
            uri,
            line_start,
            col_start,
            line_end,
            col_end,
        } => {
            let range = Range::new(
                Position::new(line_start.saturating_sub(1), col_start.saturating_sub(1)),
                Position::new(line_end.saturating_sub(1), *col_end),
            );
            (uri, range)
        }
        ResolvableLocation::WholeFile { uri } => (uri, Range::file_start()),
    };
    let file = snapshot.resolve_source_file(strip_file_scheme(uri))?;
    Some(ResolvedLocation { file, range })
}

/// Engine uris may carry a `file:` scheme; the snapshot capability speaks
/// plain paths.
fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix("file://")
        .or_else(|| uri.strip_prefix("file:"))
        .unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::StaticSnapshot;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn snapshot() -> StaticSnapshot {
        StaticSnapshot::new().with_file("/src/main.c", "/snap/src/main.c")
    }

    #[test]
    fn line_column_converts_to_zero_based_half_open() {
        let loc = ResolvableLocation::LineColumn {
            uri: "file:///src/main.c".to_string(),
            line_start: 1,
            col_start: 1,
            line_end: 1,
            col_end: 5,
        };
        let resolved = resolve(&loc, &snapshot()).unwrap();
        assert_eq!(resolved.file, PathBuf::from("/snap/src/main.c"));
        assert_eq!(resolved.range.start, Position::new(0, 0));
        assert_eq!(resolved.range.end, Position::new(0, 5));
    }

    #[test]
    fn zero_components_clamp_to_zero() {
        let loc = ResolvableLocation::LineColumn {
            uri: "/src/main.c".to_string(),
            line_start: 0,
            col_start: 0,
            line_end: 0,
            col_end: 0,
        };
        let resolved = resolve(&loc, &snapshot()).unwrap();
        assert_eq!(resolved.range.start, Position::new(0, 0));
        assert_eq!(resolved.range.end, Position::new(0, 0));
    }

    #[test]
    fn whole_file_resolves_to_file_start() {
        let loc = ResolvableLocation::WholeFile {
            uri: "/src/main.c".to_string(),
        };
        let resolved = resolve(&loc, &snapshot()).unwrap();
        assert_eq!(resolved.range, Range::file_start());
    }

    #[test]
    fn unmapped_file_resolves_to_none() {
        let loc = ResolvableLocation::WholeFile {
            uri: "/src/not-there.c".to_string(),
        };
        assert_eq!(resolve(&loc, &snapshot()), None);
    }
}
