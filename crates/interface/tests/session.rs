use querylens_interface::{
    FromViewMessage, PageKey, ResultSetSummary, ResultsSession, SessionEvent, ToViewMessage,
};
use querylens_locations::{ResolvableLocation, StaticSnapshot};
use querylens_results::{
    results_header, CompletedQuery, QueryInfo, QueryStatus, ResultsPaths,
};
use querylens_sarif::{
    ArtifactLocation, Log, Message, PhysicalLocation, Region, Run, SarifLocation, SarifResult,
};
use querylens_store::{
    CellValue, Column, ColumnKind, MemoryStore, MemoryTable, QueryMetadata, SourceInfo,
};
use std::path::PathBuf;

fn select_table(rows: usize) -> MemoryTable {
    MemoryTable {
        name: "#select".to_string(),
        columns: vec![Column {
            name: Some("n".to_string()),
            kind: ColumnKind::Integer,
        }],
        rows: (0..rows)
            .map(|row| vec![CellValue::Integer(row as i64)])
            .collect(),
    }
}

fn alert_log() -> Log {
    Log {
        version: None,
        runs: vec![Run {
            results: Some(vec![SarifResult {
                message: Message::plain("something happened here"),
                locations: Some(vec![SarifLocation {
                    id: None,
                    physical_location: Some(PhysicalLocation {
                        artifact_location: Some(ArtifactLocation {
                            uri: Some("src/a.c".to_string()),
                            uri_base_id: Some("%SRCROOT%".to_string()),
                        }),
                        region: Some(Region {
                            start_line: 2,
                            start_column: Some(1),
                            end_line: Some(2),
                            end_column: Some(5),
                        }),
                    }),
                    message: None,
                }]),
                related_locations: None,
            }]),
        }],
    }
}

async fn session_with_run(
    dir: &tempfile::TempDir,
    rows: usize,
    metadata: Option<QueryMetadata>,
) -> (ResultsSession<MemoryStore>, u64) {
    let store = MemoryStore::new();
    let paths = ResultsPaths::for_results(dir.path().join("run.qres"));
    store.add_results(paths.results.clone(), vec![select_table(rows)]);
    store.add_interpretation(paths.results.clone(), alert_log());

    let status = QueryStatus::Success { evaluation_ms: 5 };
    let header = results_header(&store, &status, &paths).await.unwrap();
    let query = CompletedQuery::new(
        QueryInfo {
            run_id: 1,
            query_name: "Select".to_string(),
            database_name: "db".to_string(),
            time: "now".to_string(),
            metadata,
            paths,
        },
        status,
        header,
    );

    let snapshot = StaticSnapshot::new().with_file("/checkout/src/a.c", "/snap/src/a.c");
    let mut session = ResultsSession::new(
        store,
        Box::new(snapshot),
        Some(SourceInfo {
            source_archive: PathBuf::from("/snap"),
            source_location_prefix: "/checkout".to_string(),
        }),
    );
    let run_id = session.add_query(query);
    (session, run_id)
}

fn problem_metadata() -> QueryMetadata {
    QueryMetadata {
        kind: Some("problem".to_string()),
        id: Some("cpp/example".to_string()),
        ..QueryMetadata::default()
    }
}

#[tokio::test]
async fn get_page_data_answers_with_the_same_key() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 250, None).await;

    let key = PageKey {
        run_id,
        result_set: "#select".to_string(),
        page: 2,
        sort: None,
    };
    let events = session
        .handle(FromViewMessage::GetPageData { page: key.clone() })
        .await;
    assert_eq!(events.len(), 1);
    let SessionEvent::Post(ToViewMessage::SetResult { page, results }) = &events[0] else {
        panic!("expected a SetResult, got {events:?}");
    };
    assert_eq!(page, &key);
    assert_eq!(results.tuples.len(), 50);
}

#[tokio::test]
async fn missing_pages_and_unknown_runs_answer_with_an_empty_page() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 50, None).await;

    for key in [
        PageKey {
            run_id,
            result_set: "#select".to_string(),
            page: 99,
            sort: None,
        },
        PageKey {
            run_id: 424242,
            result_set: "#select".to_string(),
            page: 0,
            sort: None,
        },
    ] {
        let events = session
            .handle(FromViewMessage::GetPageData { page: key.clone() })
            .await;
        let SessionEvent::Post(ToViewMessage::SetResult { page, results }) = &events[0] else {
            panic!("expected a SetResult, got {events:?}");
        };
        assert_eq!(page, &key);
        assert!(results.tuples.is_empty());
    }
}

#[tokio::test]
async fn view_source_file_navigates_when_resolvable() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 10, None).await;

    let events = session
        .handle(FromViewMessage::ViewSourceFile {
            loc: ResolvableLocation::LineColumn {
                uri: "/checkout/src/a.c".to_string(),
                line_start: 2,
                col_start: 1,
                line_end: 2,
                col_end: 5,
            },
            run_id,
        })
        .await;
    let [SessionEvent::Navigate(resolved)] = events.as_slice() else {
        panic!("expected a navigation, got {events:?}");
    };
    assert_eq!(resolved.file, PathBuf::from("/snap/src/a.c"));
    assert_eq!(resolved.range.start.line, 1);

    // Locations outside the snapshot degrade to nothing.
    let events = session
        .handle(FromViewMessage::ViewSourceFile {
            loc: ResolvableLocation::WholeFile {
                uri: "/checkout/src/elsewhere.c".to_string(),
            },
            run_id,
        })
        .await;
    assert_eq!(events, vec![]);
}

#[tokio::test]
async fn toggling_diagnostics_publishes_and_clears() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 10, Some(problem_metadata())).await;

    let events = session
        .handle(FromViewMessage::ToggleDiagnostics {
            run_id,
            visible: true,
        })
        .await;
    assert_eq!(events, vec![SessionEvent::DiagnosticsChanged(run_id)]);
    let published = session.diagnostics().get(run_id).unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[&PathBuf::from("/snap/src/a.c")][0].message,
        "something happened here"
    );

    let events = session
        .handle(FromViewMessage::ToggleDiagnostics {
            run_id,
            visible: false,
        })
        .await;
    assert_eq!(events, vec![SessionEvent::DiagnosticsChanged(run_id)]);
    assert!(session.diagnostics().get(run_id).is_none());
}

#[tokio::test]
async fn show_results_includes_alerts_only_when_interpretable() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 10, Some(problem_metadata())).await;

    let events = session.show_results(run_id).await;
    let [SessionEvent::Post(ToViewMessage::SetQuery { results })] = events.as_slice() else {
        panic!("expected a SetQuery, got {events:?}");
    };
    assert_eq!(results.run_id, run_id);
    let names: Vec<_> = results
        .result_sets
        .iter()
        .map(ResultSetSummary::name)
        .collect();
    assert_eq!(names, vec!["#select", "alerts"]);

    // Without metadata there is no alerts entry, but raw sets survive.
    let dir = tempfile::tempdir().unwrap();
    let (mut session, run_id) = session_with_run(&dir, 10, None).await;
    let events = session.show_results(run_id).await;
    let [SessionEvent::Post(ToViewMessage::SetQuery { results })] = events.as_slice() else {
        panic!("expected a SetQuery, got {events:?}");
    };
    let names: Vec<_> = results
        .result_sets
        .iter()
        .map(ResultSetSummary::name)
        .collect();
    assert_eq!(names, vec!["#select"]);

    session.handle(FromViewMessage::ViewLoaded).await;
    assert!(session.view_loaded());
}

#[tokio::test]
async fn outbound_helper_events_carry_their_payload() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = session_with_run(&dir, 1, None).await;
    assert_eq!(
        session.results_updating(),
        SessionEvent::Post(ToViewMessage::ResultsUpdating)
    );
    assert_eq!(
        session.navigate_path(-1),
        SessionEvent::Post(ToViewMessage::NavigatePath { direction: -1 })
    );
}
