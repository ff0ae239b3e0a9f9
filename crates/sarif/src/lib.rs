//! # QueryLens SARIF
//!
//! The subset of the SARIF static-analysis log format that interpreted
//! ("alert") results use, together with the two pieces of interpretation
//! logic that sit right next to the format:
//!
//! - parsing the placeholder syntax `[text](id)` that alert messages use to
//!   reference their related locations, and
//! - converting a SARIF location into the engine location model so it can be
//!   resolved against a source snapshot.
//!
//! Only the fields this viewer reads are modeled; unknown fields are
//! ignored on input and omitted on output.

mod convert;
mod message;
mod types;

pub use convert::location_from_sarif;
pub use message::{parse_message, MessagePart};
pub use types::{ArtifactLocation, Log, Message, PhysicalLocation, Region, Run, SarifLocation, SarifResult};
