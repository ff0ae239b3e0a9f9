use querylens_locations::ResolvableLocation;
use querylens_results::{Interpretation, RunId};
use querylens_store::{Column, Page, SortSpec};
use serde::{Deserialize, Serialize};

/// The identity a page request and its response share. Two keys correlate
/// iff every field matches, the sort specification included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageKey {
    pub run_id: RunId,
    pub result_set: String,
    pub page: usize,
    /// `None` is the natural, unsorted order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

/// What the view knows about each result set of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ResultSetSummary {
    Raw {
        name: String,
        rows: usize,
        columns: Vec<Column>,
    },
    Alerts {
        name: String,
        interpretation: Interpretation,
    },
}

impl ResultSetSummary {
    pub fn name(&self) -> &str {
        match self {
            ResultSetSummary::Raw { name, .. } | ResultSetSummary::Alerts { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsInfo {
    pub run_id: RunId,
    pub result_sets: Vec<ResultSetSummary>,
}

/// Messages flowing into the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ToViewMessage {
    /// A new evaluation is underway; the view may show a loading state.
    ResultsUpdating,
    SetQuery {
        results: ResultsInfo,
    },
    SetResult {
        page: PageKey,
        results: Page,
    },
    /// Step through the current alert path: 1 forward, -1 back.
    NavigatePath {
        direction: i32,
    },
}

/// Messages flowing out of the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum FromViewMessage {
    ViewLoaded,
    ViewSourceFile {
        loc: ResolvableLocation,
        run_id: RunId,
    },
    ToggleDiagnostics {
        run_id: RunId,
        visible: bool,
    },
    GetPageData {
        page: PageKey,
    },
}
