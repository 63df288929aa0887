//! Raw performance entries as read from the page.
//!
//! Field names follow the browser's Performance Timeline so the in-page scripts
//! can hand entries over without renaming. All timestamps are milliseconds
//! relative to the navigation's time origin.

use serde::{Deserialize, Serialize};

/// Everything the collector reads synchronously at invocation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    #[serde(default)]
    pub navigation: Option<NavigationEntry>,
    #[serde(default)]
    pub paint: Vec<PaintEntry>,
    #[serde(default)]
    pub layout_shifts: Vec<LayoutShiftEntry>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// `PerformanceNavigationTiming` timestamps used by the derived durations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationEntry {
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub secure_connection_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
}

/// Paint timing entry (`first-paint`, `first-contentful-paint`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    pub name: String,
    pub start_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftEntry {
    pub value: f64,
    #[serde(default)]
    pub had_recent_input: bool,
}

/// Resource timing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub name: String,
    #[serde(default)]
    pub initiator_type: String,
    pub duration: f64,
    /// Zero for cross-origin resources without `Timing-Allow-Origin`
    #[serde(default)]
    pub transfer_size: u64,
}

/// One `largest-contentful-paint` report, in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpEntry {
    pub start_time: f64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub load_time: f64,
    #[serde(default)]
    pub render_time: f64,
    #[serde(default)]
    pub element: Option<ElementEntry>,
}

/// DOM element attached to an LCP report, untruncated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementEntry {
    pub tag_name: String,
    pub id: String,
    pub class_name: String,
    pub src: String,
    pub text_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_parses_page_payload() {
        let payload = r#"{
            "navigation": {
                "domainLookupStart": 1.0,
                "domainLookupEnd": 11.0,
                "requestStart": 20.0,
                "responseStart": 95.5,
                "entryType": "navigation"
            },
            "paint": [{"name": "first-contentful-paint", "startTime": 412.3}],
            "layoutShifts": [{"value": 0.05, "hadRecentInput": false}],
            "resources": [{
                "name": "https://example.com/app.js",
                "initiatorType": "script",
                "duration": 120.0
            }]
        }"#;

        let snapshot: PerformanceSnapshot = serde_json::from_str(payload).unwrap();

        let nav = snapshot.navigation.unwrap();
        assert_eq!(nav.domain_lookup_end, 11.0);
        assert_eq!(nav.connect_start, 0.0);
        assert_eq!(snapshot.paint[0].start_time, 412.3);
        assert!(!snapshot.layout_shifts[0].had_recent_input);
        assert_eq!(snapshot.resources[0].transfer_size, 0);
    }

    #[test]
    fn test_snapshot_without_navigation_entry() {
        let snapshot: PerformanceSnapshot =
            serde_json::from_str(r#"{"navigation": null}"#).unwrap();

        assert!(snapshot.navigation.is_none());
        assert!(snapshot.paint.is_empty());
        assert!(snapshot.resources.is_empty());
    }
}
