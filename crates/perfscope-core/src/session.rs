//! Capabilities the runner and collector need from a browser.
//!
//! `perfscope-browser` implements these over the Chrome DevTools Protocol;
//! tests implement them with canned data.

use crate::Result;
use crate::metrics::entries::{LcpEntry, PerformanceSnapshot};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::BTreeMap;
use std::time::Duration;

/// Load state a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Load event fired and no new network activity for a short quiet period
    NetworkIdle,
    /// `DOMContentLoaded` fired
    DomContentLoaded,
}

impl WaitUntil {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::NetworkIdle => "networkidle",
            WaitUntil::DomContentLoaded => "domcontentloaded",
        }
    }
}

/// Read access to the page's Performance Timeline
#[async_trait]
pub trait PerformanceSource: Send + Sync {
    /// Navigation, paint, layout-shift and resource entries as of now
    async fn snapshot(&self) -> Result<PerformanceSnapshot>;

    /// Subscribe to `largest-contentful-paint` entries, buffered ones included.
    ///
    /// The stream yields entries in the order the page reported them.
    async fn observe_lcp(&self) -> Result<BoxStream<'static, LcpEntry>>;

    /// Unsubscribe and return entries reported but not yet yielded
    async fn disconnect_lcp(&self) -> Result<Vec<LcpEntry>>;
}

/// A page in an attached browser, scoped to one test run
#[async_trait]
pub trait PageSession: PerformanceSource {
    async fn set_extra_headers(&self, headers: &BTreeMap<String, String>) -> Result<()>;

    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()>;

    async fn reload(&self, wait_until: WaitUntil, timeout: Duration) -> Result<()>;

    async fn clear_cache(&self) -> Result<()>;

    async fn clear_cookies(&self) -> Result<()>;

    /// Release the connection. Dropping the session must release it too.
    async fn close(self) -> Result<()>;
}

/// Opens a fresh session for each run
#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: PageSession;

    async fn connect(&self) -> Result<Self::Session>;
}
