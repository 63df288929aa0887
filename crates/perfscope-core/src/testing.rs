//! In-memory sessions for exercising the collector and runner without a browser.

use crate::metrics::entries::{LcpEntry, PerformanceSnapshot};
use crate::session::{PageSession, PerformanceSource, SessionConnector, WaitUntil};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type CallLog = Arc<Mutex<Vec<String>>>;

pub struct FakePage {
    snapshot: std::result::Result<PerformanceSnapshot, String>,
    lcp: Vec<LcpEntry>,
    undelivered_lcp: Vec<LcpEntry>,
    failing_waits: Vec<WaitUntil>,
    lcp_disconnected: AtomicBool,
    calls: CallLog,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            snapshot: Ok(PerformanceSnapshot::default()),
            lcp: Vec::new(),
            undelivered_lcp: Vec::new(),
            failing_waits: Vec::new(),
            lcp_disconnected: AtomicBool::new(false),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_snapshot(mut self, snapshot: PerformanceSnapshot) -> Self {
        self.snapshot = Ok(snapshot);
        self
    }

    pub fn failing_snapshot(mut self, message: &str) -> Self {
        self.snapshot = Err(message.to_string());
        self
    }

    pub fn with_lcp(mut self, entries: Vec<LcpEntry>) -> Self {
        self.lcp = entries;
        self
    }

    pub fn with_undelivered_lcp(mut self, entries: Vec<LcpEntry>) -> Self {
        self.undelivered_lcp = entries;
        self
    }

    /// Navigations and reloads waiting for `wait_until` fail
    pub fn failing_wait(mut self, wait_until: WaitUntil) -> Self {
        self.failing_waits.push(wait_until);
        self
    }

    pub fn lcp_disconnected(&self) -> bool {
        self.lcp_disconnected.load(Ordering::SeqCst)
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn wait(&self, target: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()> {
        self.log(format!("{} {}", target, wait_until.as_str()));
        if self.failing_waits.contains(&wait_until) {
            return Err(Error::Timeout {
                waiting_for: format!("{} on {}", wait_until.as_str(), target),
                after: timeout,
            });
        }
        Ok(())
    }
}

impl Drop for FakePage {
    fn drop(&mut self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push("released".to_string());
        }
    }
}

#[async_trait]
impl PerformanceSource for FakePage {
    async fn snapshot(&self) -> Result<PerformanceSnapshot> {
        self.snapshot.clone().map_err(Error::Evaluation)
    }

    async fn observe_lcp(&self) -> Result<BoxStream<'static, LcpEntry>> {
        Ok(stream::iter(self.lcp.clone()).boxed())
    }

    async fn disconnect_lcp(&self) -> Result<Vec<LcpEntry>> {
        self.lcp_disconnected.store(true, Ordering::SeqCst);
        Ok(self.undelivered_lcp.clone())
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn set_extra_headers(&self, headers: &BTreeMap<String, String>) -> Result<()> {
        let names: Vec<_> = headers.keys().cloned().collect();
        self.log(format!("headers {}", names.join(",")));
        Ok(())
    }

    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()> {
        self.wait(&format!("goto {}", url), wait_until, timeout)
    }

    async fn reload(&self, wait_until: WaitUntil, timeout: Duration) -> Result<()> {
        self.wait("reload", wait_until, timeout)
    }

    async fn clear_cache(&self) -> Result<()> {
        self.log("clear-cache".to_string());
        Ok(())
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.log("clear-cookies".to_string());
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.log("close".to_string());
        Ok(())
    }
}

/// Hands out pre-built pages in order; `None` entries fail to connect
pub struct FakeConnector {
    pages: Mutex<VecDeque<Option<FakePage>>>,
    calls: CallLog,
}

impl FakeConnector {
    pub fn new(pages: Vec<Option<FakePage>>) -> Self {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let pages = pages
            .into_iter()
            .map(|page| {
                page.map(|mut page| {
                    page.calls = calls.clone();
                    page
                })
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    type Session = FakePage;

    async fn connect(&self) -> Result<FakePage> {
        let next = self.pages.lock().unwrap().pop_front();
        match next {
            Some(Some(page)) => {
                self.calls.lock().unwrap().push("connect".to_string());
                Ok(page)
            }
            _ => Err(Error::Session("connection refused".to_string())),
        }
    }
}
