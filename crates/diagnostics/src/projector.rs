use crate::types::{Diagnostic, FileDiagnostics, RelatedInformation, Severity};
use querylens_locations::{resolve, ResolvedLocation, SourceSnapshot};
use querylens_results::Interpretation;
use querylens_sarif::{location_from_sarif, parse_message, MessagePart, SarifLocation};
use std::collections::HashMap;

/// Projects the first run of an interpretation into per-file diagnostics.
///
/// Pure in its inputs: the same interpretation and snapshot always produce
/// the same map, so callers can replace any previously published
/// diagnostics wholesale.
pub fn project(interpretation: &Interpretation, snapshot: &dyn SourceSnapshot) -> FileDiagnostics {
    let mut diagnostics = FileDiagnostics::new();
    let prefix = &interpretation.source_location_prefix;

    let Some(results) = interpretation
        .log
        .runs
        .first()
        .and_then(|run| run.results.as_ref())
    else {
        log::warn!("interpreted log has no run with results; nothing to project");
        return diagnostics;
    };

    for result in results {
        let Some(text) = result.message.text.as_deref() else {
            log::warn!("skipping alert without a plain-text message");
            continue;
        };
        let Some(primary) = result.locations.as_ref().and_then(|locs| locs.first()) else {
            log::warn!("skipping alert without a location");
            continue;
        };
        let Some(resolved) = resolve_sarif(primary, prefix, snapshot) else {
            log::warn!("skipping alert whose primary location is not resolvable");
            continue;
        };

        let related_by_id: HashMap<u32, &SarifLocation> = result
            .related_locations
            .iter()
            .flatten()
            .filter_map(|loc| Some((loc.id?, loc)))
            .collect();

        let mut message = String::new();
        let mut related = Vec::new();
        for part in parse_message(text) {
            match part {
                MessagePart::Text(text) => message.push_str(&text),
                MessagePart::Link { dest, text } => {
                    // The reference text always stays in the message, even
                    // when the id points nowhere.
                    message.push_str(&text);
                    match related_by_id.get(&dest) {
                        None => {
                            log::warn!("alert message references unknown related location {dest}")
                        }
                        Some(target) => {
                            if let Some(location) = resolve_sarif(target, prefix, snapshot) {
                                related.push(RelatedInformation {
                                    location,
                                    message: text,
                                });
                            }
                        }
                    }
                }
            }
        }

        diagnostics
            .entry(resolved.file.clone())
            .or_default()
            .push(Diagnostic {
                range: resolved.range,
                message,
                severity: Severity::Warning,
                related,
            });
    }

    diagnostics
}

fn resolve_sarif(
    loc: &SarifLocation,
    prefix: &str,
    snapshot: &dyn SourceSnapshot,
) -> Option<ResolvedLocation> {
    let location = location_from_sarif(loc, prefix)?;
    resolve(&location.resolvable()?, snapshot)
}
