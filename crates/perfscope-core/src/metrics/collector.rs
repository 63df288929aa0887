use super::entries::{LayoutShiftEntry, NavigationEntry, PaintEntry, ResourceEntry};
use super::lcp::{LCP_WINDOW, LcpObservation};
use super::types::{
    FcpDetails, NavigationTiming, PageMetrics, ResourceSummary, SlowResource, WebVitals,
};
use crate::Result;
use crate::session::PerformanceSource;
use chrono::Utc;
use std::time::Duration;

pub const FCP_ENTRY_NAME: &str = "first-contentful-paint";
pub const PAINT_SOURCE: &str = "performance.getEntriesByType(\"paint\")";
pub const PAINT_METHOD: &str = "Standard Paint Timing API";
pub const FCP_NO_DATA_REASON: &str = "No first-contentful-paint entry found";
pub const RESOURCE_SOURCE: &str = "performance.getEntriesByType(\"resource\")";

/// Assembles a [`PageMetrics`] record from a page's performance entries
pub struct MetricsCollector {
    lcp_window: Duration,
    slowest_count: usize,
}

impl MetricsCollector {
    pub fn new(lcp_window: Duration) -> Self {
        Self {
            lcp_window,
            slowest_count: 5,
        }
    }

    /// Collect metrics from `source`.
    ///
    /// Synchronous readings are taken before the LCP window starts, so they
    /// reflect the page at invocation time.
    pub async fn collect<S>(&self, source: &S) -> Result<PageMetrics>
    where
        S: PerformanceSource + ?Sized,
    {
        tracing::debug!("Collecting performance snapshot");
        let captured_at = Utc::now();
        let snapshot = source.snapshot().await?;

        let navigation = snapshot.navigation.as_ref().map(navigation_timing);
        let (fcp, fcp_details) = first_contentful_paint(&snapshot.paint);
        let cls = cumulative_layout_shift(&snapshot.layout_shifts);
        let resources = summarize_resources(&snapshot.resources, self.slowest_count);

        tracing::debug!("Observing LCP for {:?}", self.lcp_window);
        let candidates = source.observe_lcp().await?;
        let mut observation = LcpObservation::observe(candidates, self.lcp_window).await;
        let undelivered = source.disconnect_lcp().await?;
        if !undelivered.is_empty() {
            tracing::debug!("Folding in {} undelivered LCP entries", undelivered.len());
        }
        observation.extend(undelivered);
        let lcp_details = observation.finish();

        Ok(PageMetrics {
            captured_at,
            navigation,
            web_vitals: WebVitals {
                fcp,
                fcp_details,
                lcp: lcp_details.value,
                lcp_details,
                cls,
            },
            resources,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(LCP_WINDOW)
    }
}

pub fn navigation_timing(entry: &NavigationEntry) -> NavigationTiming {
    let ssl_handshake = if entry.secure_connection_start > 0.0 {
        Some(entry.connect_end - entry.secure_connection_start)
    } else {
        None
    };

    NavigationTiming {
        dns_lookup: entry.domain_lookup_end - entry.domain_lookup_start,
        tcp_connect: entry.connect_end - entry.connect_start,
        ssl_handshake,
        ttfb: entry.response_start - entry.request_start,
        dom_content_loaded: entry.dom_content_loaded_event_end
            - entry.dom_content_loaded_event_start,
        load_complete: entry.load_event_end - entry.load_event_start,
    }
}

pub fn first_contentful_paint(paint: &[PaintEntry]) -> (Option<f64>, FcpDetails) {
    let all_paint_entries = paint.to_vec();

    match paint.iter().find(|entry| entry.name == FCP_ENTRY_NAME) {
        Some(entry) => (
            Some(entry.start_time),
            FcpDetails {
                source: Some(PAINT_SOURCE.to_string()),
                method: Some(PAINT_METHOD.to_string()),
                reason: None,
                all_paint_entries,
            },
        ),
        None => (
            None,
            FcpDetails {
                source: None,
                method: None,
                reason: Some(FCP_NO_DATA_REASON.to_string()),
                all_paint_entries,
            },
        ),
    }
}

/// Shifts that follow user input are expected and excluded
pub fn cumulative_layout_shift(shifts: &[LayoutShiftEntry]) -> f64 {
    shifts
        .iter()
        .filter(|shift| !shift.had_recent_input)
        .fold(0.0, |total, shift| total + shift.value)
}

pub fn summarize_resources(resources: &[ResourceEntry], top_n: usize) -> ResourceSummary {
    let total_size = resources.iter().map(|r| r.transfer_size).sum();

    let mut slowest: Vec<_> = resources
        .iter()
        .map(|r| SlowResource {
            name: r.name.clone(),
            initiator_type: r.initiator_type.clone(),
            duration: r.duration,
            size: r.transfer_size,
        })
        .collect();

    // stable, so equal durations keep page order
    slowest.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    slowest.truncate(top_n);

    ResourceSummary {
        total_count: resources.len(),
        total_size,
        collection_method: RESOURCE_SOURCE.to_string(),
        slowest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::entries::{LcpEntry, PerformanceSnapshot};
    use crate::metrics::types::MeasurementStatus;
    use crate::testing::FakePage;

    fn resource(name: &str, duration: f64, size: u64) -> ResourceEntry {
        ResourceEntry {
            name: name.to_string(),
            initiator_type: "script".to_string(),
            duration,
            transfer_size: size,
        }
    }

    #[test]
    fn test_navigation_timing_derivation() {
        let entry = NavigationEntry {
            domain_lookup_start: 5.0,
            domain_lookup_end: 25.0,
            connect_start: 25.0,
            connect_end: 90.0,
            secure_connection_start: 40.0,
            request_start: 91.0,
            response_start: 211.5,
            dom_content_loaded_event_start: 600.0,
            dom_content_loaded_event_end: 612.0,
            load_event_start: 900.0,
            load_event_end: 903.0,
        };

        let timing = navigation_timing(&entry);

        assert_eq!(timing.dns_lookup, 20.0);
        assert_eq!(timing.tcp_connect, 65.0);
        assert_eq!(timing.ssl_handshake, Some(50.0));
        assert_eq!(timing.ttfb, 120.5);
        assert_eq!(timing.dom_content_loaded, 12.0);
        assert_eq!(timing.load_complete, 3.0);
    }

    #[test]
    fn test_plain_http_has_no_ssl_handshake() {
        let entry = NavigationEntry {
            connect_end: 30.0,
            secure_connection_start: 0.0,
            ..Default::default()
        };

        assert_eq!(navigation_timing(&entry).ssl_handshake, None);
    }

    #[test]
    fn test_fcp_found_with_provenance() {
        let paint = vec![
            PaintEntry {
                name: "first-paint".to_string(),
                start_time: 380.0,
            },
            PaintEntry {
                name: FCP_ENTRY_NAME.to_string(),
                start_time: 412.0,
            },
        ];

        let (fcp, details) = first_contentful_paint(&paint);

        assert_eq!(fcp, Some(412.0));
        assert_eq!(details.source.as_deref(), Some(PAINT_SOURCE));
        assert_eq!(details.all_paint_entries.len(), 2);
        assert!(details.reason.is_none());
    }

    #[test]
    fn test_fcp_missing_records_reason_and_entries() {
        let paint = vec![PaintEntry {
            name: "first-paint".to_string(),
            start_time: 380.0,
        }];

        let (fcp, details) = first_contentful_paint(&paint);

        assert!(fcp.is_none());
        assert_eq!(details.reason.as_deref(), Some(FCP_NO_DATA_REASON));
        assert_eq!(details.all_paint_entries, paint);
    }

    #[test]
    fn test_cls_excludes_shifts_after_input() {
        let shifts = vec![
            LayoutShiftEntry {
                value: 0.05,
                had_recent_input: false,
            },
            LayoutShiftEntry {
                value: 0.4,
                had_recent_input: true,
            },
            LayoutShiftEntry {
                value: 0.02,
                had_recent_input: false,
            },
        ];

        let cls = cumulative_layout_shift(&shifts);

        assert!((cls - 0.07).abs() < 1e-9);
    }

    #[test]
    fn test_resources_sorted_descending_and_capped() {
        let resources = vec![
            resource("a.js", 10.0, 100),
            resource("b.css", 250.0, 2_000),
            resource("c.png", 90.0, 0),
            resource("d.js", 250.0, 50),
            resource("e.woff2", 40.0, 300),
            resource("f.js", 500.0, 1_024),
            resource("g.js", 5.0, 10),
        ];

        let summary = summarize_resources(&resources, 5);

        assert_eq!(summary.total_count, 7);
        assert_eq!(summary.total_size, 3_484);
        assert_eq!(summary.slowest.len(), 5);
        let names: Vec<_> = summary.slowest.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["f.js", "b.css", "d.js", "c.png", "e.woff2"]);
        assert!(
            summary
                .slowest
                .windows(2)
                .all(|pair| pair[0].duration >= pair[1].duration)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_assembles_page_metrics() {
        let page = FakePage::new()
            .with_snapshot(PerformanceSnapshot {
                navigation: Some(NavigationEntry {
                    request_start: 10.0,
                    response_start: 130.0,
                    ..Default::default()
                }),
                paint: vec![PaintEntry {
                    name: FCP_ENTRY_NAME.to_string(),
                    start_time: 700.0,
                }],
                layout_shifts: vec![LayoutShiftEntry {
                    value: 0.1,
                    had_recent_input: false,
                }],
                resources: vec![resource("app.js", 80.0, 4_096)],
            })
            .with_lcp(vec![
                LcpEntry {
                    start_time: 700.0,
                    size: 1_200,
                    load_time: 0.0,
                    render_time: 700.0,
                    element: None,
                },
                LcpEntry {
                    start_time: 1_300.0,
                    size: 48_000,
                    load_time: 1_250.0,
                    render_time: 1_300.0,
                    element: None,
                },
            ]);

        let metrics = MetricsCollector::default().collect(&page).await.unwrap();

        assert_eq!(metrics.navigation.unwrap().ttfb, 120.0);
        assert_eq!(metrics.web_vitals.fcp, Some(700.0));
        assert_eq!(metrics.web_vitals.lcp, Some(1_300.0));
        assert_eq!(metrics.web_vitals.cls, 0.1);
        assert_eq!(metrics.resources.total_size, 4_096);
        let last = metrics.web_vitals.lcp_details.measurements.last().unwrap();
        assert_eq!(last.status, MeasurementStatus::Final);
        assert!(page.lcp_disconnected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_folds_in_undelivered_lcp_entries() {
        let page = FakePage::new()
            .with_lcp(vec![LcpEntry {
                start_time: 400.0,
                size: 100,
                load_time: 0.0,
                render_time: 400.0,
                element: None,
            }])
            .with_undelivered_lcp(vec![LcpEntry {
                start_time: 2_950.0,
                size: 90_000,
                load_time: 2_900.0,
                render_time: 2_950.0,
                element: None,
            }]);

        let metrics = MetricsCollector::default().collect(&page).await.unwrap();

        assert_eq!(metrics.web_vitals.lcp, Some(2_950.0));
        assert_eq!(metrics.web_vitals.lcp_details.entries.len(), 2);
        assert!(metrics.navigation.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_without_lcp_entries() {
        let page = FakePage::new();

        let metrics = MetricsCollector::default().collect(&page).await.unwrap();

        assert!(metrics.web_vitals.lcp.is_none());
        assert!(metrics.web_vitals.lcp_details.reason.is_some());
        assert_eq!(metrics.resources.total_count, 0);
    }

    #[tokio::test]
    async fn test_collect_propagates_evaluation_failure() {
        let page = FakePage::new().failing_snapshot("ReferenceError: performance is not defined");

        let result = MetricsCollector::default().collect(&page).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ReferenceError"));
    }
}
