use anyhow::Result;
use clap::Parser;
use perfscope_cli::CacheArg;
use perfscope_cli::commands::run::{self, RunArgs};
use perfscope_core::config::DEFAULT_CDP_URL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perfscope")]
#[command(author, version, long_about = None)]
#[command(
    about = "Measure page-load performance of a URL through a running Chrome",
    long_about = "perfscope attaches to a browser over the Chrome DevTools Protocol, loads a URL \
                  under warm or cold cache, and reports its page-load performance (FCP, LCP, \
                  CLS, navigation and resource timing) with an explanation of how each value \
                  was obtained."
)]
struct Cli {
    /// URL to test
    #[arg(value_name = "URL")]
    url: String,

    /// Cache mode
    #[arg(long, value_enum, default_value = "warm")]
    cache: CacheArg,

    /// Number of test runs
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Path to config file (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file path (auto-generated if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Chrome DevTools Protocol URL
    #[arg(long, default_value = DEFAULT_CDP_URL)]
    cdp_url: String,

    /// Wait time between runs in seconds
    #[arg(long, default_value_t = 5)]
    wait: u64,

    /// Add HTTP header ("Header: Value"); can be repeated
    #[arg(long = "headers", value_name = "HEADER")]
    headers: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    run::execute(RunArgs {
        url: cli.url,
        cache_mode: cli.cache.into(),
        runs: cli.runs,
        config: cli.config,
        output: cli.output,
        cdp_url: cli.cdp_url,
        wait: cli.wait,
        headers: cli.headers,
    })
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("perfscope=debug,perfscope_core=debug,perfscope_browser=debug")
    } else {
        EnvFilter::new("perfscope=info,perfscope_core=info,perfscope_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
