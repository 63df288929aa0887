mod collector;
pub mod entries;
mod lcp;
mod types;

pub use collector::{
    MetricsCollector, cumulative_layout_shift, first_contentful_paint, navigation_timing,
    summarize_resources,
};
pub use lcp::{LCP_WINDOW, LcpObservation};
pub use types::{
    CacheMode, FcpDetails, LcpCandidate, LcpDetails, LcpElement, LcpMeasurement,
    MeasurementStatus, NavigationTiming, PageMetrics, ResourceSummary, RunRecord, SlowResource,
    WebVitals,
};
