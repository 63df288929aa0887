use crate::lcp_feed::LcpFeed;
use crate::navigation::{DocumentState, LoadProgress, POLL_INTERVAL};
use crate::{Error, Result, scripts};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::{
    ClearBrowserCacheParams, ClearBrowserCookiesParams, EnableParams, Headers,
    SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::{NavigateParams, ReloadParams};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use futures::stream::BoxStream;
use perfscope_core::metrics::entries::{LcpEntry, PerformanceSnapshot};
use perfscope_core::session::{PageSession, PerformanceSource, SessionConnector, WaitUntil};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);
// Targets of an existing browser are reported shortly after attaching
const PAGE_DISCOVERY_TIMEOUT: Duration = Duration::from_millis(500);

/// Attaches to a running browser through its DevTools endpoint
pub struct CdpConnector {
    cdp_url: String,
}

impl CdpConnector {
    pub fn new(cdp_url: impl Into<String>) -> Self {
        Self {
            cdp_url: cdp_url.into(),
        }
    }

    pub fn cdp_url(&self) -> &str {
        &self.cdp_url
    }

    async fn attach(&self) -> Result<CdpPageSession> {
        tracing::debug!("CDP: connecting to {}", self.cdp_url);

        // The browser may still be starting up
        let (browser, mut handler) = {
            let mut retries = CONNECT_ATTEMPTS;
            loop {
                match Browser::connect(self.cdp_url.as_str()).await {
                    Ok(result) => {
                        tracing::debug!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(Error::Browser(format!(
                                "Failed to connect to {} after {} attempts: {}",
                                self.cdp_url, CONNECT_ATTEMPTS, e
                            )));
                        }
                        tracing::debug!(
                            "CDP connection attempt failed, retrying... ({} left)",
                            retries
                        );
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        };

        // Commands only complete while the handler is being polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let attached = &browser;
        let existing = first_discovered(PAGE_DISCOVERY_TIMEOUT, move || async move {
            attached.pages().await.map_err(Error::from)
        })
        .await?;

        let (page, owns_page) = match existing {
            Some(page) => {
                tracing::debug!("CDP: using existing page");
                (page, false)
            }
            None => {
                tracing::debug!("CDP: no existing pages, creating one");
                (browser.new_page("about:blank").await?, true)
            }
        };

        page.execute(EnableParams::default()).await?;

        Ok(CdpPageSession {
            page,
            owns_page,
            lcp_feed: LcpFeed::new(),
            _browser: browser,
            handler_task,
        })
    }
}

#[async_trait]
impl SessionConnector for CdpConnector {
    type Session = CdpPageSession;

    async fn connect(&self) -> perfscope_core::Result<CdpPageSession> {
        Ok(self.attach().await?)
    }
}

/// One page of the attached browser. Dropping it detaches; a page the
/// session created itself is closed by [`PageSession::close`].
pub struct CdpPageSession {
    page: Page,
    owns_page: bool,
    lcp_feed: LcpFeed,
    _browser: Browser,
    handler_task: JoinHandle<()>,
}

enum Navigation<'a> {
    Goto(&'a str),
    Reload,
}

impl CdpPageSession {
    async fn document_state(&self) -> Result<DocumentState> {
        evaluate(&self.page, scripts::DOCUMENT_STATE).await
    }

    async fn load(&self, navigation: Navigation<'_>, wait_until: WaitUntil) -> Result<()> {
        let previous_origin = match self.document_state().await {
            Ok(state) => Some(state.time_origin),
            Err(e) => {
                tracing::debug!("Could not read current document: {}", e);
                None
            }
        };

        match navigation {
            Navigation::Goto(url) => {
                let response = self.page.execute(NavigateParams::new(url)).await?;
                if let Some(error_text) = response.result.error_text.clone() {
                    return Err(Error::Browser(format!("{}: {}", url, error_text)));
                }
            }
            Navigation::Reload => {
                self.page.execute(ReloadParams::default()).await?;
            }
        }

        let mut progress = LoadProgress::new(wait_until, previous_origin);
        loop {
            match self.document_state().await {
                Ok(state) => {
                    if progress.observe(&state, Instant::now()) {
                        tracing::debug!("Reached {} ({:?})", wait_until.as_str(), state);
                        return Ok(());
                    }
                }
                // the execution context is torn down mid-navigation
                Err(e) => tracing::debug!("Document not ready: {}", e),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn load_within(
        &self,
        target: &str,
        navigation: Navigation<'_>,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> perfscope_core::Result<()> {
        match tokio::time::timeout(timeout, self.load(navigation, wait_until)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(perfscope_core::Error::Navigation {
                url: target.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(perfscope_core::Error::Timeout {
                waiting_for: format!("{} on {}", wait_until.as_str(), target),
                after: timeout,
            }),
        }
    }
}

impl Drop for CdpPageSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[async_trait]
impl PerformanceSource for CdpPageSession {
    async fn snapshot(&self) -> perfscope_core::Result<PerformanceSnapshot> {
        Ok(evaluate(&self.page, scripts::SNAPSHOT).await?)
    }

    async fn observe_lcp(&self) -> perfscope_core::Result<BoxStream<'static, LcpEntry>> {
        evaluate::<bool>(&self.page, scripts::LCP_OBSERVE).await?;
        self.lcp_feed.reset();

        let page = self.page.clone();
        Ok(self.lcp_feed.stream(move |from| {
            let page = page.clone();
            async move { evaluate::<Vec<LcpEntry>>(&page, &scripts::lcp_drain(from)).await }
        }))
    }

    async fn disconnect_lcp(&self) -> perfscope_core::Result<Vec<LcpEntry>> {
        let script = scripts::lcp_disconnect(self.lcp_feed.delivered());
        Ok(evaluate(&self.page, &script).await?)
    }
}

#[async_trait]
impl PageSession for CdpPageSession {
    async fn set_extra_headers(
        &self,
        headers: &BTreeMap<String, String>,
    ) -> perfscope_core::Result<()> {
        let params = SetExtraHttpHeadersParams::new(header_map(headers));
        self.page.execute(params).await.map_err(Error::from)?;
        Ok(())
    }

    async fn navigate(
        &self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> perfscope_core::Result<()> {
        tracing::debug!("Navigating to {} (wait for {})", url, wait_until.as_str());
        self.load_within(url, Navigation::Goto(url), wait_until, timeout)
            .await
    }

    async fn reload(&self, wait_until: WaitUntil, timeout: Duration) -> perfscope_core::Result<()> {
        tracing::debug!("Reloading (wait for {})", wait_until.as_str());
        let target = self.page.url().await.ok().flatten().unwrap_or_default();
        self.load_within(&target, Navigation::Reload, wait_until, timeout)
            .await
    }

    async fn clear_cache(&self) -> perfscope_core::Result<()> {
        self.page
            .execute(ClearBrowserCacheParams::default())
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn clear_cookies(&self) -> perfscope_core::Result<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn close(self) -> perfscope_core::Result<()> {
        if self.owns_page {
            tracing::debug!("CDP: closing page created for this session");
            if let Err(e) = self.page.clone().close().await {
                tracing::debug!("Could not close page: {}", e);
            }
        }
        tracing::debug!("CDP: detaching from browser");
        drop(self);
        Ok(())
    }
}

async fn evaluate<T: DeserializeOwned>(page: &Page, script: &str) -> Result<T> {
    let params = EvaluateParams::builder()
        .expression(script)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(Error::Evaluation)?;

    let result = page.evaluate_expression(params).await.map_err(|e| match e {
        chromiumoxide::error::CdpError::JavascriptException(details) => {
            Error::Evaluation(details.text.clone())
        }
        other => Error::from(other),
    })?;

    Ok(result.into_value()?)
}

/// Poll `list` until it yields something or `timeout` elapses
async fn first_discovered<T, F, Fut>(timeout: Duration, mut list: F) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = list().await?.into_iter().next() {
            return Ok(Some(found));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Headers {
    Headers::new(serde_json::Value::Object(
        headers
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
            .collect(),
    ))
}
