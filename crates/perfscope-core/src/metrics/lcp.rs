//! Bounded Largest Contentful Paint observation.
//!
//! The browser keeps reporting larger LCP candidates as the page renders, each
//! one superseding the previous. We accumulate whatever arrives during a fixed
//! window and treat the last candidate as final. Updates after the window
//! closes are not seen.

use super::entries::{ElementEntry, LcpEntry};
use super::types::{LcpCandidate, LcpDetails, LcpElement, LcpMeasurement, MeasurementStatus};
use futures::{Stream, StreamExt};
use std::time::Duration;

/// Length of the observation window
pub const LCP_WINDOW: Duration = Duration::from_millis(3000);

pub const LCP_METHOD: &str = "PerformanceObserver with buffered entries";
pub const LCP_NO_DATA_REASON: &str = "No LCP entries captured by observer";

const ELEMENT_TEXT_LIMIT: usize = 80;

/// Candidates accumulated during one window
#[derive(Debug, Default)]
pub struct LcpObservation {
    candidates: Vec<LcpCandidate>,
}

impl LcpObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `candidates` until `window` elapses.
    ///
    /// Always suspends for the full window, even if the stream ends early.
    pub async fn observe<S>(candidates: S, window: Duration) -> Self
    where
        S: Stream<Item = LcpEntry> + Unpin,
    {
        let mut observation = Self::new();
        let mut candidates = candidates.fuse();
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = &mut deadline => break,
                entry = candidates.next() => match entry {
                    Some(entry) => observation.record(entry),
                    None => {
                        (&mut deadline).await;
                        break;
                    }
                },
            }
        }

        tracing::debug!(
            "LCP window closed after {:?} with {} candidates",
            window,
            observation.len()
        );

        observation
    }

    /// Append a candidate; it becomes the current largest
    pub fn record(&mut self, entry: LcpEntry) {
        self.candidates.push(LcpCandidate {
            start_time: entry.start_time,
            size: entry.size,
            load_time: entry.load_time,
            render_time: entry.render_time,
            element: entry.element.map(LcpElement::from),
        });
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = LcpEntry>) {
        for entry in entries {
            self.record(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Select the final candidate and build the measurement timeline
    pub fn finish(self) -> LcpDetails {
        let Some(last) = self.candidates.last() else {
            return LcpDetails {
                value: None,
                method: LCP_METHOD.to_string(),
                entries: Vec::new(),
                final_element: None,
                measurements: Vec::new(),
                reason: Some(LCP_NO_DATA_REASON.to_string()),
            };
        };

        let value = Some(last.start_time);
        let final_element = last.element.clone();
        let final_index = self.candidates.len() - 1;

        let measurements = self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| LcpMeasurement {
                sequence: i + 1,
                timing: candidate.start_time,
                size: candidate.size,
                status: if i == final_index {
                    MeasurementStatus::Final
                } else {
                    MeasurementStatus::Superseded
                },
            })
            .collect();

        LcpDetails {
            value,
            method: LCP_METHOD.to_string(),
            entries: self.candidates,
            final_element,
            measurements,
            reason: None,
        }
    }
}

impl From<ElementEntry> for LcpElement {
    fn from(raw: ElementEntry) -> Self {
        Self {
            tag_name: raw.tag_name,
            id: raw.id,
            class_name: raw.class_name,
            src: abbreviate(&raw.src, |head| head),
            text_content: abbreviate(&raw.text_content, collapse_whitespace),
        }
    }
}

/// First 80 characters, cleaned up by `tidy`, followed by `...`; empty stays empty
fn abbreviate(value: &str, tidy: impl FnOnce(String) -> String) -> String {
    if value.is_empty() {
        return String::new();
    }
    let head: String = value.chars().take(ELEMENT_TEXT_LIMIT).collect();
    format!("{}...", tidy(head))
}

fn collapse_whitespace(text: String) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
