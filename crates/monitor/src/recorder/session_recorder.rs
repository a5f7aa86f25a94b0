#![forbid(unsafe_code)]

use super::{SessionAverages, synthetic_sessions, text_report};
use crate::domain::{RequestContext, SessionMetrics, SourceSample};
use crate::stores::BoundedQueue;
use rand::Rng;
use tracing::{debug, trace};

/// Accumulates the in-progress playback session and keeps the bounded
/// history of committed ones.
#[derive(Debug)]
pub struct SessionRecorder {
    current: SessionMetrics,
    history: BoundedQueue<SessionMetrics>,
    report_limit: usize,
}

impl SessionRecorder {
    pub fn new(config: &config::History) -> Self {
        Self {
            current: SessionMetrics::default(),
            history: BoundedQueue::new(config.capacity),
            report_limit: config.report_limit,
        }
    }

    /// Discard any in-progress session and begin a fresh one at `now`.
    pub fn open_session(&mut self, now: u64) {
        self.current = SessionMetrics {
            start_time: Some(now),
            ..Default::default()
        };
        trace!(now, "session opened");
    }

    pub fn record_search_time(&mut self, ms: u64) {
        self.current.search_time = ms;
    }

    pub fn record_test_time(&mut self, ms: u64) {
        self.current.test_time = ms;
    }

    pub fn record_total_time(&mut self, ms: u64) {
        self.current.total_time = ms;
    }

    pub fn record_source_count(&mut self, count: usize) {
        self.current.source_count = count;
    }

    pub fn record_selected_source(&mut self, source: impl Into<String>) {
        self.current.selected_source = source.into();
    }

    pub fn record_cache_hit(&mut self, hit: bool) {
        self.current.cache_hit = hit;
    }

    pub fn record_sources_info(&mut self, sources: Vec<SourceSample>) {
        self.current.set_sources_info(sources);
    }

    pub fn record_request(&mut self, request: RequestContext) {
        self.current.request.merge(request);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.current.request.errors.push(message.into());
    }

    pub fn record_retry_count(&mut self, count: u32) {
        self.current.retry_count = count;
    }

    /// The session being recorded, as it would be committed right now.
    pub fn current(&self) -> &SessionMetrics {
        &self.current
    }

    /// Commit the in-progress session with `end_time = now`.
    ///
    /// Returns `None` and commits nothing when no total time was recorded.
    /// The in-progress session is then kept as is, so recording a total time
    /// and closing again commits it.
    pub fn close_session(&mut self, now: u64) -> Option<SessionMetrics> {
        if self.current.total_time == 0 {
            debug!("session closed without a total time, nothing committed");
            return None;
        }

        let mut metrics = std::mem::take(&mut self.current);
        metrics.end_time = Some(now);
        if let Some(evicted) = self.history.push(metrics.clone()) {
            trace!(?evicted.start_time, "oldest session evicted");
        }
        debug!(
            total_time = metrics.total_time,
            history = self.history.len(),
            "session committed"
        );
        Some(metrics)
    }

    /// Copy of every committed session, oldest first.
    pub fn history(&self) -> Vec<SessionMetrics> {
        self.history.to_vec()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn averages(&self) -> SessionAverages {
        SessionAverages::compute(self.history.iter())
    }

    /// Averages cover the whole history; the listing only the newest entries.
    pub fn text_report(&self) -> String {
        text_report(&self.history(), self.report_limit)
    }

    /// Replace the history, keeping the newest entries that fit.
    pub fn restore(&mut self, sessions: Vec<SessionMetrics>) {
        self.history.replace(sessions);
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.current = SessionMetrics::default();
    }

    /// Replace the history with `count` synthetic sessions ending at `now`.
    pub fn generate_synthetic<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, now: u64) {
        self.history.replace(synthetic_sessions(rng, count, now));
        debug!(sessions = self.history.len(), "synthetic history generated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder(capacity: usize) -> SessionRecorder {
        SessionRecorder::new(&config::History {
            capacity,
            ..Default::default()
        })
    }

    #[test]
    fn close_without_total_commits_nothing() {
        let mut recorder = recorder(50);
        recorder.open_session(1);
        recorder.record_search_time(300);
        recorder.record_test_time(900);
        recorder.record_source_count(2);
        assert_eq!(recorder.close_session(2), None);
        assert!(recorder.is_empty());
        // the in-progress session survives and can still be completed
        recorder.record_total_time(1_500);
        assert!(recorder.close_session(3).is_some());
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn reopening_discards_in_progress_session() {
        let mut recorder = recorder(50);
        recorder.open_session(1);
        recorder.record_total_time(1_000);
        recorder.open_session(2);
        assert_eq!(recorder.close_session(3), None);
    }

    #[test]
    fn committed_session_matches_recorded_fields() {
        let mut recorder = recorder(50);
        recorder.open_session(100);
        recorder.record_search_time(500);
        recorder.record_test_time(1_200);
        recorder.record_total_time(3_000);
        recorder.record_source_count(4);
        recorder.record_selected_source("https://b");
        recorder.record_cache_hit(true);
        recorder.record_retry_count(1);
        recorder.record_error("first source timed out");
        recorder.record_request(RequestContext {
            request_id: Some("req-1".into()),
            ..Default::default()
        });
        let expected_before_close = recorder.current().clone();

        let committed = recorder.close_session(4_000).unwrap();
        assert_eq!(committed.end_time, Some(4_000));
        assert_eq!(
            SessionMetrics {
                end_time: None,
                ..committed.clone()
            },
            expected_before_close
        );
        assert_eq!(recorder.history(), vec![committed]);
    }

    #[test]
    fn history_evicts_oldest() {
        let mut recorder = recorder(3);
        for total in 1..=5 {
            recorder.open_session(total);
            recorder.record_total_time(total);
            recorder.close_session(total);
        }
        let totals: Vec<_> = recorder.history().iter().map(|s| s.total_time).collect();
        assert_eq!(totals, vec![3, 4, 5]);
    }

    #[test]
    fn clear_empties_history_and_current() {
        let mut recorder = recorder(3);
        recorder.open_session(1);
        recorder.record_total_time(10);
        recorder.close_session(2);
        recorder.record_total_time(20);
        recorder.clear();
        assert!(recorder.is_empty());
        assert_eq!(recorder.current(), &SessionMetrics::default());
        assert_eq!(recorder.averages(), SessionAverages::default());
    }
}
