use serde::{Deserialize, Serialize};

/// Descriptive statistics over one metric, or a no-data marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricStats {
    Measured {
        avg: f64,
        min: f64,
        max: f64,
        median: f64,
    },
    NoData,
}

impl MetricStats {
    /// Compute stats over `values`.
    ///
    /// The median is the element at index `len / 2` of the sorted values, so
    /// even-length inputs take the upper of the two middle elements rather
    /// than their mean.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return MetricStats::NoData;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;

        MetricStats::Measured {
            avg,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: sorted[sorted.len() / 2],
        }
    }

    pub fn avg(&self) -> Option<f64> {
        match self {
            MetricStats::Measured { avg, .. } => Some(*avg),
            MetricStats::NoData => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, MetricStats::Measured { .. })
    }
}
