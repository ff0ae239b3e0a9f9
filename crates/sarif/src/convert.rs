use crate::types::SarifLocation;
use querylens_locations::Location;

/// Converts a SARIF location into the engine location model, resolving
/// relative uris against `source_location_prefix`.
///
/// A location without a physical location or artifact uri yields `None`;
/// alerts carrying one are simply not navigable. A location without a
/// region covers the whole file. SARIF end columns are exclusive while the
/// engine's five-part convention is inclusive, so the end column loses one
/// here; the resolver then leaves end columns untouched.
pub fn location_from_sarif(loc: &SarifLocation, source_location_prefix: &str) -> Option<Location> {
    let physical = loc.physical_location.as_ref()?;
    let artifact = physical.artifact_location.as_ref()?;
    let uri = artifact.uri.as_deref()?;
    let uri = if artifact.uri_base_id.is_some() {
        format!("{}/{}", source_location_prefix.trim_end_matches('/'), uri)
    } else {
        uri.to_string()
    };

    match &physical.region {
        None => Some(Location::WholeFile { uri }),
        Some(region) => {
            let col_start = region.start_column.unwrap_or(1);
            let col_end = match region.end_column {
                Some(end) => end.saturating_sub(1).max(col_start),
                None => col_start,
            };
            Some(Location::LineColumn {
                uri,
                line_start: region.start_line,
                col_start,
                line_end: region.end_line.unwrap_or(region.start_line),
                col_end,
            })
        }
    }
}
