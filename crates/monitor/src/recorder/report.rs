#![forbid(unsafe_code)]

use super::SessionAverages;
use crate::domain::SessionMetrics;
use std::fmt::Write;

/// Returned instead of a report when no session has been committed.
pub const NO_DATA_REPORT: &str = "No playback performance data available.";

/// Human-readable summary of `sessions`, listing the newest `limit` entries.
pub fn text_report(sessions: &[SessionMetrics], limit: usize) -> String {
    if sessions.is_empty() {
        return NO_DATA_REPORT.to_string();
    }

    let averages = SessionAverages::compute(sessions.iter());
    let cache_label = if averages.cache_mostly_hits {
        "high"
    } else {
        "low"
    };

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Playback performance report");
    let _ = writeln!(out, "===========================");
    let _ = writeln!(out, "Average search time: {}ms", averages.avg_search_time);
    let _ = writeln!(out, "Average test time: {}ms", averages.avg_test_time);
    let _ = writeln!(out, "Average total load time: {}ms", averages.avg_total_time);
    let _ = writeln!(out, "Average sources per session: {}", averages.avg_source_count);
    let _ = writeln!(out, "Cache hit rate: {cache_label}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Recent sessions:");

    let skip = sessions.len().saturating_sub(limit);
    for (i, session) in sessions.iter().skip(skip).enumerate() {
        let source = if session.selected_source.is_empty() {
            "unknown source"
        } else {
            session.selected_source.as_str()
        };
        let _ = writeln!(out, "{}. {}ms via {}", i + 1, session.total_time, source);
    }

    out
}
