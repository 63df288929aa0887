use serde::{Deserialize, Serialize};
use std::fmt;

const FCP_EXCELLENT_MS: f64 = 1800.0;
const FCP_GOOD_MS: f64 = 3000.0;
const LCP_EXCELLENT_MS: f64 = 2500.0;
const LCP_GOOD_MS: f64 = 4000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricRating {
    Excellent,
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRating {
    Excellent,
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub fcp_rating: MetricRating,
    pub lcp_rating: MetricRating,
    pub overall_rating: OverallRating,
}

impl Assessment {
    /// Rate average FCP and LCP; a missing average fails every threshold
    pub fn from_averages(fcp_avg: Option<f64>, lcp_avg: Option<f64>) -> Self {
        let fcp = fcp_avg.unwrap_or(f64::INFINITY);
        let lcp = lcp_avg.unwrap_or(f64::INFINITY);

        let overall_rating = if fcp < FCP_EXCELLENT_MS && lcp < LCP_EXCELLENT_MS {
            OverallRating::Excellent
        } else if fcp < FCP_GOOD_MS && lcp < LCP_GOOD_MS {
            OverallRating::Good
        } else {
            OverallRating::NeedsImprovement
        };

        Self {
            fcp_rating: rate(fcp, FCP_EXCELLENT_MS, FCP_GOOD_MS),
            lcp_rating: rate(lcp, LCP_EXCELLENT_MS, LCP_GOOD_MS),
            overall_rating,
        }
    }
}

fn rate(value: f64, excellent_below: f64, good_below: f64) -> MetricRating {
    if value < excellent_below {
        MetricRating::Excellent
    } else if value < good_below {
        MetricRating::Good
    } else {
        MetricRating::Poor
    }
}

impl MetricRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricRating::Excellent => "excellent",
            MetricRating::Good => "good",
            MetricRating::Poor => "poor",
        }
    }
}

impl OverallRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallRating::Excellent => "excellent",
            OverallRating::Good => "good",
            OverallRating::NeedsImprovement => "needs_improvement",
        }
    }
}

impl fmt::Display for MetricRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
