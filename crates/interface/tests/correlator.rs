use querylens_interface::{FromViewMessage, PageKey, PageRequestCorrelator, ToViewMessage};
use querylens_store::{CellValue, Page, SortDirection, SortSpec};
use std::sync::Arc;
use tokio::sync::mpsc;

fn key(run_id: u64, result_set: &str, page: usize, sort: Option<SortSpec>) -> PageKey {
    PageKey {
        run_id,
        result_set: result_set.to_string(),
        page,
        sort,
    }
}

fn page_with(text: &str) -> Page {
    Page {
        tuples: vec![vec![CellValue::String(text.to_string())]],
        next: None,
    }
}

#[tokio::test]
async fn a_matching_response_resolves_the_request() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let correlator = Arc::new(PageRequestCorrelator::new(tx));

    let requested = key(1, "#select", 0, None);
    let pending = {
        let correlator = Arc::clone(&correlator);
        let requested = requested.clone();
        tokio::spawn(async move { correlator.request(requested).await })
    };

    // The request goes out on the channel.
    let outbound = rx.recv().await.unwrap();
    assert_eq!(
        outbound,
        FromViewMessage::GetPageData {
            page: requested.clone()
        }
    );

    let resolved = correlator.deliver(&ToViewMessage::SetResult {
        page: requested,
        results: page_with("row"),
    });
    assert_eq!(resolved, 1);
    assert_eq!(pending.await.unwrap(), Some(page_with("row")));
    assert_eq!(correlator.pending_len(), 0);
}

#[tokio::test]
async fn responses_for_other_keys_do_not_resolve() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let correlator = Arc::new(PageRequestCorrelator::new(tx));

    let sort = SortSpec {
        column_index: 0,
        direction: SortDirection::Ascending,
    };
    let requested = key(1, "#select", 2, Some(sort));
    let pending = {
        let correlator = Arc::clone(&correlator);
        let requested = requested.clone();
        tokio::spawn(async move { correlator.request(requested).await })
    };
    tokio::task::yield_now().await;

    // Differ in exactly one field each; none may match.
    let near_misses = vec![
        key(2, "#select", 2, Some(sort)),
        key(1, "#problems", 2, Some(sort)),
        key(1, "#select", 3, Some(sort)),
        key(1, "#select", 2, None),
        key(
            1,
            "#select",
            2,
            Some(SortSpec {
                column_index: 0,
                direction: SortDirection::Descending,
            }),
        ),
    ];
    for miss in near_misses {
        let resolved = correlator.deliver(&ToViewMessage::SetResult {
            page: miss,
            results: page_with("wrong"),
        });
        assert_eq!(resolved, 0);
    }
    assert_eq!(correlator.pending_len(), 1);
    assert!(!pending.is_finished());

    let resolved = correlator.deliver(&ToViewMessage::SetResult {
        page: requested,
        results: page_with("right"),
    });
    assert_eq!(resolved, 1);
    assert_eq!(pending.await.unwrap(), Some(page_with("right")));
}

#[tokio::test]
async fn unsolicited_responses_are_dropped() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let correlator = PageRequestCorrelator::new(tx);
    let resolved = correlator.deliver(&ToViewMessage::SetResult {
        page: key(9, "#select", 0, None),
        results: page_with("nobody asked"),
    });
    assert_eq!(resolved, 0);
}

#[tokio::test]
async fn non_page_messages_resolve_nothing() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let correlator = PageRequestCorrelator::new(tx);
    assert_eq!(correlator.deliver(&ToViewMessage::ResultsUpdating), 0);
}

#[tokio::test]
async fn abandoned_requests_are_pruned_on_a_later_scan() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let correlator = Arc::new(PageRequestCorrelator::new(tx));

    let abandoned = {
        let correlator = Arc::clone(&correlator);
        let requested = key(1, "#select", 0, None);
        tokio::spawn(async move { correlator.request(requested).await })
    };
    tokio::task::yield_now().await;
    assert_eq!(correlator.pending_len(), 1);
    abandoned.abort();
    let _ = abandoned.await;

    // A delivery for an unrelated key walks the table and drops the dead
    // entry without resolving anything.
    let resolved = correlator.deliver(&ToViewMessage::SetResult {
        page: key(2, "#other", 5, None),
        results: page_with("unrelated"),
    });
    assert_eq!(resolved, 0);
    assert_eq!(correlator.pending_len(), 0);
}
