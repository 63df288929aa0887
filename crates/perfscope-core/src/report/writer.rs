use super::TestReport;
use crate::Result;
use crate::metrics::CacheMode;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub struct ResultWriter;

impl ResultWriter {
    /// Write a report to a file, creating parent directories as needed
    pub fn to_file(report: &TestReport, path: &Path) -> Result<()> {
        tracing::debug!("Writing results to: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::info!(
            "Wrote {} run results to {}",
            report.results.len(),
            path.display()
        );

        Ok(())
    }

    pub fn to_string(report: &TestReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// `detailed_perf_<url>_<cache>_<YYYYmmdd_HHMMSS>.json` inside `dir`
pub fn default_output_name(
    dir: &Path,
    url: &str,
    cache_mode: CacheMode,
    at: DateTime<Local>,
) -> PathBuf {
    let safe_url = url
        .replace("https://", "")
        .replace("http://", "")
        .replace(['/', ':'], "_");

    dir.join(format!(
        "detailed_perf_{}_{}_{}.json",
        safe_url,
        cache_mode,
        at.format("%Y%m%d_%H%M%S")
    ))
}
