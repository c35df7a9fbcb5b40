//! Session windowing for Cumulative Layout Shift.
//!
//! Shifts are grouped into sessions: a session closes when the next shift
//! starts more than [`SESSION_GAP_MS`] after the previous one ended, or more
//! than [`SESSION_SPAN_MS`] after the session's first shift. CLS is the largest
//! session total seen so far, not the sum over the page's lifetime.

use super::diagnostics::Diagnostics;
use super::recorder::MetricRecorder;
use super::types::{LayoutShiftEntry, MetricKind};

/// Maximum gap between consecutive shifts of one session (ms).
pub const SESSION_GAP_MS: f64 = 1000.0;
/// Maximum span of a session, measured from its first shift (ms).
pub const SESSION_SPAN_MS: f64 = 5000.0;

#[derive(Debug, Clone, Default)]
pub struct ClsAggregator {
    session_value: f64,
    session_entries: Vec<LayoutShiftEntry>,
    last_session_end: f64,
    cls_value: f64,
    cls_entries: Vec<LayoutShiftEntry>,
}

impl ClsAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one shift. Returns `false` when the shift followed recent input
    /// and was ignored.
    pub fn observe(&mut self, entry: &LayoutShiftEntry) -> bool {
        if entry.had_recent_input {
            return false;
        }

        if self.crosses_boundary(entry) {
            self.close_session();
        }

        self.session_value += entry.value;
        self.session_entries.push(entry.clone());
        self.last_session_end = entry.start_time + entry.duration;
        true
    }

    fn crosses_boundary(&self, entry: &LayoutShiftEntry) -> bool {
        let gap = entry.start_time - self.last_session_end;
        if gap > SESSION_GAP_MS {
            return true;
        }
        self.session_entries
            .first()
            .is_some_and(|first| entry.start_time - first.start_time > SESSION_SPAN_MS)
    }

    fn close_session(&mut self) {
        if self.session_value > self.cls_value {
            tracing::debug!(
                "CLS session closed at {} with new maximum {}",
                self.last_session_end,
                self.session_value
            );
            self.cls_value = self.session_value;
            self.cls_entries = std::mem::take(&mut self.session_entries);
        } else {
            self.session_entries.clear();
        }
        self.session_value = 0.0;
    }

    /// Largest session total among closed sessions and the open one.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.cls_value.max(self.session_value)
    }

    /// Shifts of the best closed session, or of the open session while no
    /// session has closed with a positive total.
    #[must_use]
    pub fn evidence(&self) -> &[LayoutShiftEntry] {
        if self.cls_entries.is_empty() {
            &self.session_entries
        } else {
            &self.cls_entries
        }
    }

    /// Processes one delivered batch in order, logs every counted shift, and
    /// writes the current CLS through to the recorder.
    pub fn handle_batch(
        &mut self,
        entries: &[LayoutShiftEntry],
        recorder: &mut MetricRecorder,
        diagnostics: &mut Diagnostics,
    ) {
        for entry in entries {
            if self.observe(entry) {
                diagnostics.push_layout_shift(entry);
            }
        }
        recorder.record(MetricKind::Cls, self.value(), self.evidence());
    }
}
