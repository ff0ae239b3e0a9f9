//! # QueryLens Locations
//!
//! The location model shared by every result-facing component: how the
//! analysis engine describes a place in the analyzed source tree, and how
//! that description is turned into a concrete file and text range inside a
//! source snapshot.
//!
//! Engine locations come in four styles, only two of which can be navigated
//! to (`LineColumn` and `WholeFile`, and only with a non-empty uri). The
//! classification is pure and total: it never fails, it only declines.
//!
//! ```text
//! Location ──resolvable()──> Option<ResolvableLocation>
//!                                     │
//!                 resolve(loc, snapshot)
//!                                     │
//!                                     └─> Option<ResolvedLocation { file, range }>
//! ```
//!
//! Resolution is best effort by design. A location that does not classify,
//! or whose file is absent from the snapshot, yields `None` and the caller
//! renders plain text or skips a diagnostic instead.

mod location;
mod range;
mod resolver;
mod snapshot;

pub use location::{Location, ResolvableLocation};
pub use range::{Position, Range, ResolvedLocation};
pub use resolver::resolve;
pub use snapshot::{DirectorySnapshot, SourceSnapshot, StaticSnapshot};
