mod rating;
mod stats;

pub use rating::{Assessment, MetricRating, OverallRating};
pub use stats::MetricStats;

use crate::metrics::{CacheMode, RunRecord};
use serde::{Deserialize, Serialize};

/// Aggregate view over the successful runs of one test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub successful_tests: usize,
    pub cache_mode: CacheMode,
    pub metrics: MetricSummary,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    pub fcp: MetricStats,
    pub lcp: MetricStats,
    pub ttfb: MetricStats,
    pub resources: MetricStats,
}

impl MetricSummary {
    /// Metrics in report order, with display name and unit
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str, &MetricStats)> {
        [
            ("fcp", "ms", &self.fcp),
            ("lcp", "ms", &self.lcp),
            ("ttfb", "ms", &self.ttfb),
            ("resources", " items", &self.resources),
        ]
        .into_iter()
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, records: &[RunRecord]) -> Self::Output;
}

pub struct RunAnalyzer {
    cache_mode: CacheMode,
}

impl RunAnalyzer {
    pub fn new(cache_mode: CacheMode) -> Self {
        Self { cache_mode }
    }
}

impl Analyzer for RunAnalyzer {
    type Output = AnalysisResult;

    fn analyze(&self, records: &[RunRecord]) -> AnalysisResult {
        tracing::debug!("Analyzing {} successful runs", records.len());

        let fcp = MetricStats::from_values(&present(records.iter().map(RunRecord::fcp)));
        let lcp = MetricStats::from_values(&present(records.iter().map(RunRecord::lcp)));
        let ttfb = MetricStats::from_values(&present(records.iter().map(RunRecord::ttfb)));
        let resources = MetricStats::from_values(&present(
            records.iter().map(|r| Some(r.resource_count() as f64)),
        ));

        let assessment = Assessment::from_averages(fcp.avg(), lcp.avg());

        tracing::info!(
            "Analysis complete: {} runs, overall rating {}",
            records.len(),
            assessment.overall_rating
        );

        AnalysisResult {
            successful_tests: records.len(),
            cache_mode: self.cache_mode,
            metrics: MetricSummary {
                fcp,
                lcp,
                ttfb,
                resources,
            },
            assessment,
        }
    }
}

/// Values that were measured; zero counts as not measured
fn present(values: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    values.flatten().filter(|v| *v != 0.0).collect()
}
