//! Deciding when a navigation has reached its wait condition.
//!
//! The session polls [`DocumentState`] and feeds it to [`LoadProgress`]. A new
//! document is recognised by its `performance.timeOrigin`.

use perfscope_core::session::WaitUntil;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

/// Resource count must hold still this long to count as network idle
pub const NETWORK_QUIET: Duration = Duration::from_millis(500);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    pub time_origin: f64,
    pub ready_state: String,
    pub resource_count: usize,
}

impl DocumentState {
    fn dom_ready(&self) -> bool {
        matches!(self.ready_state.as_str(), "interactive" | "complete")
    }

    fn loaded(&self) -> bool {
        self.ready_state == "complete"
    }
}

pub struct LoadProgress {
    wait_until: WaitUntil,
    previous_origin: Option<f64>,
    quiet: Duration,
    last_count: Option<usize>,
    stable_since: Option<Instant>,
}

impl LoadProgress {
    /// `previous_origin` is the time origin of the document being replaced,
    /// if it could be read
    pub fn new(wait_until: WaitUntil, previous_origin: Option<f64>) -> Self {
        Self {
            wait_until,
            previous_origin,
            quiet: NETWORK_QUIET,
            last_count: None,
            stable_since: None,
        }
    }

    /// Record a poll; true once the wait condition holds
    pub fn observe(&mut self, state: &DocumentState, now: Instant) -> bool {
        if self.previous_origin == Some(state.time_origin) {
            return false;
        }

        match self.wait_until {
            WaitUntil::DomContentLoaded => state.dom_ready(),
            WaitUntil::NetworkIdle => {
                if !state.loaded() {
                    self.last_count = None;
                    self.stable_since = None;
                    return false;
                }
                if self.last_count != Some(state.resource_count) {
                    self.last_count = Some(state.resource_count);
                    self.stable_since = Some(now);
                    return false;
                }
                self.stable_since
                    .is_some_and(|since| now.duration_since(since) >= self.quiet)
            }
        }
    }
}
