use crate::messages::{FromViewMessage, PageKey, ToViewMessage};
use querylens_store::Page;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

/// Client-side request/response matcher for page data.
///
/// `request` registers a pending key and emits the outbound
/// `GetPageData`; `deliver` hands every inbound message through and
/// resolves exactly the pending entries whose key equals the response's
/// key. Responses nobody is waiting for are dropped.
///
/// There is no timeout. A caller abandons a request by dropping its
/// future; the stale registry entry is pruned on a later delivery scan. A
/// superseding request for the same logical slot does not touch the
/// earlier one, so a caller applying a late result must check it is still
/// looking at that page.
pub struct PageRequestCorrelator {
    pending: Mutex<Vec<(PageKey, oneshot::Sender<Page>)>>,
    outbound: mpsc::UnboundedSender<FromViewMessage>,
}

impl PageRequestCorrelator {
    pub fn new(outbound: mpsc::UnboundedSender<FromViewMessage>) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            outbound,
        }
    }

    /// Requests one page. Resolves to `None` only when the session side
    /// went away entirely.
    pub async fn request(&self, key: PageKey) -> Option<Page> {
        let (sender, receiver) = oneshot::channel();
        self.pending
            .lock()
            .expect("correlator poisoned")
            .push((key.clone(), sender));
        if self
            .outbound
            .send(FromViewMessage::GetPageData { page: key })
            .is_err()
        {
            log::warn!("outbound channel closed; page request cannot be sent");
        }
        receiver.await.ok()
    }

    /// Applies an inbound message. Returns how many pending requests the
    /// message resolved (always 0 for non-page messages).
    pub fn deliver(&self, msg: &ToViewMessage) -> usize {
        let ToViewMessage::SetResult { page, results } = msg else {
            return 0;
        };
        let mut pending = self.pending.lock().expect("correlator poisoned");
        let mut resolved = 0;
        let mut kept = Vec::with_capacity(pending.len());
        for (key, sender) in pending.drain(..) {
            if sender.is_closed() {
                // The requester dropped its future; forget the entry.
                continue;
            }
            if key == *page {
                if sender.send(results.clone()).is_ok() {
                    resolved += 1;
                }
            } else {
                kept.push((key, sender));
            }
        }
        *pending = kept;
        resolved
    }

    /// Number of requests still waiting for a response.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().expect("correlator poisoned").len()
    }
}
