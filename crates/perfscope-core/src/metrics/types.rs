use super::entries::PaintEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache condition a run is measured under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Reuse whatever the browser already has cached
    Warm,
    /// Clear cache and cookies, then reload
    Cold,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Warm => "warm",
            CacheMode::Cold => "cold",
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics for one page load, as assembled by the collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetrics {
    pub captured_at: DateTime<Utc>,
    pub navigation: Option<NavigationTiming>,
    pub web_vitals: WebVitals,
    pub resources: ResourceSummary,
}

/// One successful test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_number: u32,
    pub cache_mode: CacheMode,
    #[serde(flatten)]
    pub metrics: PageMetrics,
}

impl RunRecord {
    pub fn new(run_number: u32, cache_mode: CacheMode, metrics: PageMetrics) -> Self {
        Self {
            run_number,
            cache_mode,
            metrics,
        }
    }

    pub fn fcp(&self) -> Option<f64> {
        self.metrics.web_vitals.fcp
    }

    pub fn lcp(&self) -> Option<f64> {
        self.metrics.web_vitals.lcp
    }

    pub fn ttfb(&self) -> Option<f64> {
        self.metrics.navigation.as_ref().map(|n| n.ttfb)
    }

    pub fn resource_count(&self) -> usize {
        self.metrics.resources.total_count
    }
}

/// Durations derived from the navigation entry, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub dns_lookup: f64,
    pub tcp_connect: f64,
    /// `None` when no secure connection was negotiated
    pub ssl_handshake: Option<f64>,
    pub ttfb: f64,
    pub dom_content_loaded: f64,
    pub load_complete: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebVitals {
    pub fcp: Option<f64>,
    pub fcp_details: FcpDetails,
    pub lcp: Option<f64>,
    pub lcp_details: LcpDetails,
    pub cls: f64,
}

/// Provenance of the FCP value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcpDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Set when no `first-contentful-paint` entry was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub all_paint_entries: Vec<PaintEntry>,
}

/// Outcome of the bounded LCP observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcpDetails {
    pub value: Option<f64>,
    pub method: String,
    pub entries: Vec<LcpCandidate>,
    #[serde(rename = "finalElement")]
    pub final_element: Option<LcpElement>,
    pub measurements: Vec<LcpMeasurement>,
    /// Set when the observer reported nothing during the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpCandidate {
    pub start_time: f64,
    pub size: u64,
    pub load_time: f64,
    pub render_time: f64,
    pub element: Option<LcpElement>,
}

/// Descriptor of the element behind an LCP candidate; empty fields are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpElement {
    pub tag_name: String,
    pub id: String,
    pub class_name: String,
    pub src: String,
    pub text_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcpMeasurement {
    pub sequence: usize,
    pub timing: f64,
    pub size: u64,
    #[serde(rename = "reason")]
    pub status: MeasurementStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementStatus {
    #[serde(rename = "final_lcp")]
    Final,
    #[serde(rename = "superseded")]
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub total_count: usize,
    /// Sum of transfer sizes in bytes
    pub total_size: u64,
    pub collection_method: String,
    pub slowest: Vec<SlowResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowResource {
    pub name: String,
    #[serde(rename = "type")]
    pub initiator_type: String,
    pub duration: f64,
    pub size: u64,
}
