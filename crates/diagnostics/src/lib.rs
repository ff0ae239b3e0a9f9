//! # QueryLens Diagnostics
//!
//! Projects an interpreted result set into per-file diagnostic collections,
//! the shape an editor surface consumes. Each alert becomes one diagnostic
//! at its resolved primary location; `[text](id)` references in the alert
//! message become related-information entries pointing at the referenced
//! locations.
//!
//! Projection is best effort all the way down: alerts without a message or
//! location are skipped with a log line, unresolvable locations degrade to
//! plain text, and a dangling reference id keeps its text without a
//! cross-reference. Projecting the same interpretation twice yields the
//! same map.

mod projector;
mod store;
mod types;

pub use projector::project;
pub use store::DiagnosticsStore;
pub use types::{Diagnostic, FileDiagnostics, RelatedInformation, Severity};
