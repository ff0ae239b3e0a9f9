//! # QueryLens Interface
//!
//! The message boundary between the result-serving session and a results
//! view, plus the client-side machinery that consumes it.
//!
//! Both channel directions are closed tagged unions, matched exhaustively;
//! there is no default case to hide an unhandled message. Page responses
//! are correlated to requests by full [`PageKey`] equality, so a response
//! produced for one page/sort combination can never be applied to another.

mod correlator;
mod messages;
mod page_links;
mod session;

pub use correlator::PageRequestCorrelator;
pub use messages::{FromViewMessage, PageKey, ResultSetSummary, ResultsInfo, ToViewMessage};
pub use page_links::{page_links, PageLink};
pub use session::{ResultsSession, SessionEvent};
