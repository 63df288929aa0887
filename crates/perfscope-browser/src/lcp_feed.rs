//! Polling delivery of LCP entries queued in the page.
//!
//! The page keeps every entry; fetches read from a cursor and never remove
//! anything. Only entries actually yielded by the stream count as delivered,
//! so a fetch still in flight when the stream is dropped loses nothing: the
//! disconnect call returns everything past [`LcpFeed::delivered`].

use crate::Result;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use perfscope_core::metrics::entries::LcpEntry;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const LCP_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct LcpFeed {
    delivered: Arc<AtomicUsize>,
}

impl LcpFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget deliveries from an earlier observer
    pub fn reset(&self) {
        self.delivered.store(0, Ordering::SeqCst);
    }

    /// Number of queued entries the stream has handed out
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Stream entries using `fetch(from)`, which returns queued entries
    /// starting at index `from`
    pub fn stream<F, Fut>(&self, fetch: F) -> BoxStream<'static, LcpEntry>
    where
        F: FnMut(usize) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<LcpEntry>>> + Send + 'static,
    {
        let state = (fetch, VecDeque::new(), 0usize, self.delivered.clone());

        stream::unfold(state, |(mut fetch, mut pending, mut fetched, delivered)| async move {
            loop {
                if let Some(entry) = pending.pop_front() {
                    delivered.fetch_add(1, Ordering::SeqCst);
                    return Some((entry, (fetch, pending, fetched, delivered)));
                }
                match fetch(fetched).await {
                    Ok(batch) if !batch.is_empty() => {
                        fetched += batch.len();
                        pending.extend(batch);
                    }
                    Ok(_) => tokio::time::sleep(LCP_POLL_INTERVAL).await,
                    Err(e) => {
                        tracing::debug!("LCP polling stopped: {}", e);
                        return None;
                    }
                }
            }
        })
        .boxed()
    }
}
