use crate::messages::{FromViewMessage, PageKey, ResultSetSummary, ResultsInfo, ToViewMessage};
use querylens_diagnostics::{project, DiagnosticsStore};
use querylens_locations::{resolve, ResolvedLocation, SourceSnapshot};
use querylens_results::{
    interpretation, CompletedQuery, QueryHistory, RunId, ALERTS_PER_RUN_LIMIT,
};
use querylens_store::{ResultStore, SourceInfo};

/// What handling a view message asks the host to do.
#[derive(Debug, PartialEq)]
pub enum SessionEvent {
    /// Post a message back to the view.
    Post(ToViewMessage),
    /// Open an editor on a resolved location.
    Navigate(ResolvedLocation),
    /// The diagnostics published for this run changed.
    DiagnosticsChanged(RunId),
}

/// The server side of one results view: the run registry, the published
/// diagnostics, and the source snapshot navigation resolves against.
///
/// All session state lives here rather than in process-wide registries;
/// dropping the session drops everything it served.
pub struct ResultsSession<S> {
    store: S,
    snapshot: Box<dyn SourceSnapshot>,
    source_info: Option<SourceInfo>,
    history: QueryHistory,
    diagnostics: DiagnosticsStore,
    view_loaded: bool,
}

impl<S: ResultStore> ResultsSession<S> {
    pub fn new(store: S, snapshot: Box<dyn SourceSnapshot>, source_info: Option<SourceInfo>) -> Self {
        Self {
            store,
            snapshot,
            source_info,
            history: QueryHistory::new(),
            diagnostics: DiagnosticsStore::new(),
            view_loaded: false,
        }
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut QueryHistory {
        &mut self.history
    }

    pub fn diagnostics(&self) -> &DiagnosticsStore {
        &self.diagnostics
    }

    pub fn view_loaded(&self) -> bool {
        self.view_loaded
    }

    /// Registers a completed evaluation and returns its run id.
    pub fn add_query(&mut self, query: CompletedQuery) -> RunId {
        self.history.push(query)
    }

    /// Announces that a new evaluation is underway.
    pub fn results_updating(&self) -> SessionEvent {
        SessionEvent::Post(ToViewMessage::ResultsUpdating)
    }

    /// Steps the alert path viewer: 1 forward, -1 back.
    pub fn navigate_path(&self, direction: i32) -> SessionEvent {
        SessionEvent::Post(ToViewMessage::NavigatePath { direction })
    }

    /// Builds the `SetQuery` announcement for a run: every raw set from
    /// the header, plus an alerts entry when interpretation succeeds.
    /// Interpretation failure is logged and degrades to raw-only.
    pub async fn show_results(&self, run_id: RunId) -> Vec<SessionEvent> {
        let Some(query) = self.history.get(run_id) else {
            log::warn!("show_results for unknown run {run_id}");
            return Vec::new();
        };
        if !query.status().is_success() {
            return Vec::new();
        }

        let mut result_sets = Vec::new();
        if let Some(header) = query.header() {
            for schema in &header.result_sets {
                result_sets.push(ResultSetSummary::Raw {
                    name: schema.name.clone(),
                    rows: schema.rows,
                    columns: schema.columns.clone(),
                });
            }
        }

        if query.can_interpret() {
            let prefix = self
                .source_info
                .as_ref()
                .map(|source| source.source_location_prefix.clone())
                .unwrap_or_default();
            match interpretation(
                &self.store,
                query.metadata(),
                query.paths(),
                self.source_info.as_ref(),
                &prefix,
                ALERTS_PER_RUN_LIMIT,
            )
            .await
            {
                Ok(interpretation) => result_sets.push(ResultSetSummary::Alerts {
                    name: "alerts".to_string(),
                    interpretation,
                }),
                Err(err) => {
                    // Raw results stay viewable even when interpretation is
                    // impossible.
                    log::warn!("results interpretation failed: {err}; showing raw results only");
                }
            }
        }

        vec![SessionEvent::Post(ToViewMessage::SetQuery {
            results: ResultsInfo {
                run_id,
                result_sets,
            },
        })]
    }

    /// Handles one message from the view, exhaustively.
    pub async fn handle(&mut self, msg: FromViewMessage) -> Vec<SessionEvent> {
        match msg {
            FromViewMessage::ViewLoaded => {
                self.view_loaded = true;
                Vec::new()
            }
            FromViewMessage::ViewSourceFile { loc, run_id } => {
                if self.history.get(run_id).is_none() {
                    log::warn!("view_source_file for unknown run {run_id}");
                    return Vec::new();
                }
                match resolve(&loc, self.snapshot.as_ref()) {
                    Some(resolved) => vec![SessionEvent::Navigate(resolved)],
                    None => {
                        log::warn!(
                            "location {} is not in the source snapshot",
                            loc.uri()
                        );
                        Vec::new()
                    }
                }
            }
            FromViewMessage::ToggleDiagnostics { run_id, visible } => {
                self.toggle_diagnostics(run_id, visible).await
            }
            FromViewMessage::GetPageData { page } => self.get_page_data(page).await,
        }
    }

    async fn get_page_data(&mut self, key: PageKey) -> Vec<SessionEvent> {
        let page = match self.history.get(key.run_id) {
            None => {
                log::warn!("page request for unknown run {}", key.run_id);
                None
            }
            Some(query) => {
                match query
                    .get_page(&self.store, &key.result_set, key.page, key.sort.as_ref())
                    .await
                {
                    Ok(page) => page,
                    Err(err) => {
                        log::warn!("decoding page {} of {} failed: {err}", key.page, key.result_set);
                        None
                    }
                }
            }
        };
        // Always answer, so the view is never left waiting on a request the
        // session could not serve.
        vec![SessionEvent::Post(ToViewMessage::SetResult {
            page: key,
            results: page.unwrap_or_default(),
        })]
    }

    async fn toggle_diagnostics(&mut self, run_id: RunId, visible: bool) -> Vec<SessionEvent> {
        if !visible {
            self.diagnostics.clear(run_id);
            return vec![SessionEvent::DiagnosticsChanged(run_id)];
        }
        let Some(query) = self.history.get(run_id) else {
            log::warn!("toggle_diagnostics for unknown run {run_id}");
            return Vec::new();
        };
        let prefix = self
            .source_info
            .as_ref()
            .map(|source| source.source_location_prefix.clone())
            .unwrap_or_default();
        match interpretation(
            &self.store,
            query.metadata(),
            query.paths(),
            self.source_info.as_ref(),
            &prefix,
            ALERTS_PER_RUN_LIMIT,
        )
        .await
        {
            Ok(interpretation) => {
                let projected = project(&interpretation, self.snapshot.as_ref());
                self.diagnostics.set(run_id, projected);
                vec![SessionEvent::DiagnosticsChanged(run_id)]
            }
            Err(err) => {
                log::warn!("cannot compute diagnostics for run {run_id}: {err}");
                self.diagnostics.clear(run_id);
                vec![SessionEvent::DiagnosticsChanged(run_id)]
            }
        }
    }
}
