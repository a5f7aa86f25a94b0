#![forbid(unsafe_code)]

use crate::domain::SessionMetrics;
use serde::{Deserialize, Serialize};

/// Rounded means over committed sessions. All zero when there is no history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAverages {
    pub avg_search_time: u64,
    pub avg_test_time: u64,
    pub avg_total_time: u64,
    pub avg_source_count: u64,
    /// More than half of the sessions hit the cache.
    pub cache_mostly_hits: bool,
    pub sessions: usize,
}

impl SessionAverages {
    pub fn compute<'a>(sessions: impl ExactSizeIterator<Item = &'a SessionMetrics>) -> Self {
        let count = sessions.len();
        if count == 0 {
            return Self::default();
        }

        // u128 sums cannot overflow for any realistic session count
        let mut search = 0u128;
        let mut test = 0u128;
        let mut total = 0u128;
        let mut sources = 0u128;
        let mut hits = 0usize;
        for session in sessions {
            search += u128::from(session.search_time);
            test += u128::from(session.test_time);
            total += u128::from(session.total_time);
            sources += session.source_count as u128;
            hits += usize::from(session.cache_hit);
        }

        let rounded_mean = |sum: u128| (sum as f64 / count as f64).round() as u64;
        Self {
            avg_search_time: rounded_mean(search),
            avg_test_time: rounded_mean(test),
            avg_total_time: rounded_mean(total),
            avg_source_count: rounded_mean(sources),
            cache_mostly_hits: hits as f64 / count as f64 > 0.5,
            sessions: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(search: u64, total: u64, sources: usize, cache_hit: bool) -> SessionMetrics {
        SessionMetrics {
            search_time: search,
            test_time: 100,
            total_time: total,
            source_count: sources,
            cache_hit,
            ..Default::default()
        }
    }

    #[test]
    fn empty_history_is_all_zero() {
        let sessions: Vec<SessionMetrics> = Vec::new();
        assert_eq!(
            SessionAverages::compute(sessions.iter()),
            SessionAverages::default()
        );
    }

    #[test]
    fn means_are_rounded_half_up() {
        let sessions = vec![session(1, 1_000, 3, true), session(2, 2_001, 4, false)];
        let averages = SessionAverages::compute(sessions.iter());
        assert_eq!(
            averages,
            SessionAverages {
                avg_search_time: 2,
                avg_test_time: 100,
                avg_total_time: 1_501,
                avg_source_count: 4,
                cache_mostly_hits: false,
                sessions: 2,
            }
        );
    }

    #[test]
    fn extreme_durations_do_not_overflow() {
        let sessions = vec![
            session(u64::MAX, u64::MAX, 1, true),
            session(u64::MAX, u64::MAX, 1, true),
        ];
        let averages = SessionAverages::compute(sessions.iter());
        assert_eq!(averages.avg_search_time, u64::MAX);
        assert_eq!(averages.avg_total_time, u64::MAX);
        assert_eq!(averages.sessions, 2);
    }

    #[test]
    fn cache_majority_is_strict() {
        let half = vec![session(1, 1, 1, true), session(1, 1, 1, false)];
        assert!(!SessionAverages::compute(half.iter()).cache_mostly_hits);

        let most = vec![
            session(1, 1, 1, true),
            session(1, 1, 1, true),
            session(1, 1, 1, false),
        ];
        assert!(SessionAverages::compute(most.iter()).cache_mostly_hits);
    }
}
