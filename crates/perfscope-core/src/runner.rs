//! Sequences timed runs against one URL.
//!
//! Each run gets its own browser session. A run that fails for any reason is
//! logged and dropped; it never aborts the remaining runs.

use crate::Result;
use crate::config::Config;
use crate::metrics::{CacheMode, MetricsCollector, RunRecord};
use crate::session::{PageSession, SessionConnector, WaitUntil};
use std::future::Future;
use std::time::Duration;

pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);
const WARM_SETTLE: Duration = Duration::from_secs(1);

/// What to test
#[derive(Debug, Clone)]
pub struct TestPlan {
    pub url: String,
    pub cache_mode: CacheMode,
    pub runs: u32,
    /// Pause between consecutive runs
    pub wait: Duration,
}

#[derive(Debug)]
pub struct RunOutcome {
    /// Successful runs in execution order
    pub records: Vec<RunRecord>,
    /// Runs started, including failed ones
    pub attempted: u32,
    pub interrupted: bool,
}

pub struct TestRunner<C> {
    connector: C,
    config: Config,
    collector: MetricsCollector,
}

impl<C: SessionConnector> TestRunner<C> {
    pub fn new(connector: C, config: Config) -> Self {
        Self {
            connector,
            config,
            collector: MetricsCollector::default(),
        }
    }

    /// Execute `plan.runs` attempts, calling `on_record` after each success.
    ///
    /// Stops early when `shutdown` resolves; whatever completed so far is
    /// returned with `interrupted` set.
    pub async fn run<F>(
        &self,
        plan: &TestPlan,
        shutdown: impl Future<Output = ()>,
        mut on_record: F,
    ) -> RunOutcome
    where
        F: FnMut(&RunRecord),
    {
        tokio::pin!(shutdown);

        let mut outcome = RunOutcome {
            records: Vec::new(),
            attempted: 0,
            interrupted: false,
        };

        for run in 1..=plan.runs {
            println!(
                "🧪 Run {}/{} - {} cache test...",
                run, plan.runs, plan.cache_mode
            );
            outcome.attempted = run;

            let result = tokio::select! {
                _ = &mut shutdown => {
                    outcome.interrupted = true;
                    break;
                }
                result = self.run_single(plan, run) => result,
            };

            match result {
                Ok(record) => {
                    tracing::debug!("Run {} succeeded", run);
                    on_record(&record);
                    outcome.records.push(record);
                }
                Err(e) => {
                    tracing::debug!("Run {} failed: {:?}", run, e);
                    println!("   ❌ Run {} failed: {}", run, e);
                }
            }

            if run < plan.runs {
                println!("   ⏳ Waiting {}s before next run...", plan.wait.as_secs());
                tokio::select! {
                    _ = &mut shutdown => {
                        outcome.interrupted = true;
                        break;
                    }
                    _ = tokio::time::sleep(plan.wait) => {}
                }
            }
        }

        outcome
    }

    /// One attempt. The session is closed on every path; if this future is
    /// dropped mid-run the session's own `Drop` releases it.
    async fn run_single(&self, plan: &TestPlan, run: u32) -> Result<RunRecord> {
        let session = self.connector.connect().await?;

        let result = self.measure(&session, plan, run).await;

        if let Err(e) = session.close().await {
            tracing::debug!("Closing session for run {} failed: {}", run, e);
        }

        result
    }

    async fn measure(&self, session: &C::Session, plan: &TestPlan, run: u32) -> Result<RunRecord> {
        if !self.config.headers.is_empty() {
            let names: Vec<_> = self.config.headers.keys().map(String::as_str).collect();
            println!("   🔧 Setting custom HTTP headers: {}", names.join(", "));
            session.set_extra_headers(&self.config.headers).await?;
        }

        println!("   📍 Navigating to {}", plan.url);
        if let Err(e) = session
            .navigate(&plan.url, WaitUntil::NetworkIdle, NAVIGATION_TIMEOUT)
            .await
        {
            tracing::debug!("Network idle wait failed: {}", e);
            println!("   ⚠️  NetworkIdle timeout, trying domcontentloaded...");
            session
                .navigate(&plan.url, WaitUntil::DomContentLoaded, NAVIGATION_TIMEOUT)
                .await?;
        }

        match plan.cache_mode {
            CacheMode::Cold => {
                println!("   🧹 Clearing cache and cookies for cold measurement...");
                session.clear_cache().await?;
                session.clear_cookies().await?;

                println!("   🔄 Reloading page for cold cache measurement...");
                if let Err(e) = session.reload(WaitUntil::NetworkIdle, NAVIGATION_TIMEOUT).await {
                    tracing::debug!("Network idle wait on reload failed: {}", e);
                    println!("   ⚠️  NetworkIdle timeout on reload, using domcontentloaded...");
                    session
                        .reload(WaitUntil::DomContentLoaded, NAVIGATION_TIMEOUT)
                        .await?;
                }
            }
            CacheMode::Warm => {
                println!("   ♨️  Using warm cache (page already loaded)");
                tokio::time::sleep(WARM_SETTLE).await;
            }
        }

        tokio::time::sleep(self.config.stabilization_delay()).await;

        let metrics = self.collector.collect(session).await?;

        Ok(RunRecord::new(run, plan.cache_mode, metrics))
    }
}
