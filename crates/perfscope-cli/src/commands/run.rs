use crate::report::{render_analysis, render_run, render_run_summary};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use perfscope_browser::CdpConnector;
use perfscope_core::analysis::{Analyzer, RunAnalyzer};
use perfscope_core::config::{Config, ConfigOverrides, parse_header_args};
use perfscope_core::metrics::CacheMode;
use perfscope_core::report::{ResultWriter, TestConfig, TestReport, default_output_name};
use perfscope_core::runner::{TestPlan, TestRunner};
use std::path::PathBuf;
use std::time::Duration;

pub struct RunArgs {
    pub url: String,
    pub cache_mode: CacheMode,
    pub runs: u32,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub cdp_url: String,
    pub wait: u64,
    pub headers: Vec<String>,
}

pub fn execute(args: RunArgs) -> Result<()> {
    validate_url(&args.url)?;

    let config = Config::load(args.config.as_deref()).apply_overrides(ConfigOverrides {
        cdp_url: Some(args.cdp_url.clone()),
        headers: parse_header_args(&args.headers),
    });
    config.validate()?;
    tracing::debug!("Effective config: {:?}", config);

    let plan = TestPlan {
        url: args.url.clone(),
        cache_mode: args.cache_mode,
        runs: args.runs,
        wait: Duration::from_secs(args.wait),
    };

    println!(
        "🎯 Starting {} cache performance test with detailed metrics...",
        plan.cache_mode
    );
    println!("   URL: {}", plan.url);
    println!("   Runs: {}", plan.runs);
    println!("   Cache mode: {}", plan.cache_mode);
    println!("   CDP endpoint: {}", config.cdp_url);
    println!("{}", "=".repeat(80));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let timestamp = Utc::now();
    let output_dir = config.output_dir.clone();
    let runner = TestRunner::new(CdpConnector::new(config.cdp_url.clone()), config);

    let outcome = runtime.block_on(runner.run(&plan, shutdown_signal(), |record| {
        print!("{}", render_run(record));
        println!("{}", render_run_summary(record));
    }));

    if outcome.interrupted {
        println!("\n⚠️  Test interrupted by user");
    }

    let analysis = RunAnalyzer::new(plan.cache_mode).analyze(&outcome.records);
    print!("{}", render_analysis(&analysis, plan.runs));

    let report = TestReport {
        test_config: TestConfig {
            url: plan.url.clone(),
            cache_mode: plan.cache_mode,
            runs: plan.runs,
            timestamp,
        },
        results: outcome.records,
        analysis,
    };

    let output_path = args.output.unwrap_or_else(|| {
        default_output_name(&output_dir, &plan.url, plan.cache_mode, Local::now())
    });
    ResultWriter::to_file(&report, &output_path)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    println!("\n💾 Detailed results saved to: {}", output_path.display());

    if report.results.is_empty() && !outcome.interrupted {
        anyhow::bail!("All {} runs failed", outcome.attempted);
    }

    Ok(())
}

/// Only absolute http(s) URLs can be loaded
fn validate_url(input: &str) -> Result<()> {
    let parsed = url::Url::parse(input).with_context(|| format!("Invalid URL: {}", input))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => anyhow::bail!("Unsupported URL scheme '{}': {}", scheme, input),
    }
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
