#![forbid(unsafe_code)]

use config::Config;
use monitor::clock::ManualClock;
use monitor::domain::{RequestContext, SessionMetrics, SourceSample};
use monitor::persistence::{HISTORY_KEY, MemoryStore};
use monitor::recorder::NO_DATA_REPORT;
use monitor::{PerformanceMonitor, Services};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

fn monitor(store: &MemoryStore, clock: &ManualClock) -> PerformanceMonitor {
    PerformanceMonitor::new(
        Config::default(),
        Services {
            store: Box::new(store.clone()),
            clock: Arc::new(clock.clone()),
        },
    )
}

#[test]
fn close_without_total_time_commits_nothing() {
    let store = MemoryStore::default();
    let monitor = monitor(&store, &ManualClock::new(0));

    monitor.open_session();
    monitor.record_search_time(500);
    monitor.record_test_time(1_200);
    monitor.record_selected_source("https://cdn.example/a.m3u8");
    assert_eq!(monitor.close_session(), None);
    assert!(monitor.history().is_empty());
    assert!(!store.contains(HISTORY_KEY));

    // the in-progress session survives a refused close
    monitor.record_total_time(3_000);
    assert_eq!(monitor.close_session().map(|m| m.search_time), Some(500));
}

#[test]
fn committed_session_matches_recorded_fields() {
    let clock = ManualClock::new(10_000);
    let monitor = monitor(&MemoryStore::default(), &clock);

    let sources = vec![
        SourceSample::new("https://a.example", true, 40, 10_100).with_quality("1080p"),
        SourceSample::new("https://b.example", true, 85, 10_200).with_cdn_optimized(true),
        SourceSample::new("https://c.example", false, 900, 10_300),
        SourceSample::new("https://d.example", true, 120, 10_400).with_cache_hit(true),
    ];
    let request = RequestContext {
        request_id: Some("req-1".into()),
        video_id: Some("v-42".into()),
        video_title: Some("Pilot".into()),
        network_type: Some("4g".into()),
        final_quality: Some("1080p".into()),
        bandwidth_estimate: Some(12_000),
        errors: Vec::new(),
    };

    monitor.open_session();
    monitor.record_search_time(500);
    monitor.record_test_time(1_200);
    monitor.record_total_time(3_000);
    monitor.record_source_count(4);
    monitor.record_selected_source("https://a.example");
    monitor.record_cache_hit(true);
    monitor.record_sources_info(sources.clone());
    monitor.record_request(request.clone());
    monitor.record_error("first source timed out");
    monitor.record_retry_count(2);
    clock.advance(Duration::from_millis(3_000));

    let committed = monitor.close_session().unwrap();
    let expected = SessionMetrics {
        search_time: 500,
        test_time: 1_200,
        total_time: 3_000,
        source_count: 4,
        selected_source: "https://a.example".into(),
        cache_hit: true,
        sources_info: sources,
        available_sources_count: 3,
        source_success_rate: 0.75,
        request: RequestContext {
            errors: vec!["first source timed out".into()],
            ..request
        },
        start_time: Some(10_000),
        end_time: Some(13_000),
        retry_count: 2,
    };
    assert_eq!(committed, expected);
    assert_eq!(monitor.history(), vec![expected]);
    assert_eq!(monitor.current_session(), SessionMetrics::default());
}

#[test]
fn history_keeps_newest_fifty() {
    let monitor = monitor(&MemoryStore::default(), &ManualClock::new(0));
    for i in 1..=60u64 {
        monitor.open_session();
        monitor.record_total_time(i);
        monitor.record_selected_source(format!("s{i}"));
        monitor.close_session().unwrap();
    }

    let history = monitor.history();
    assert_eq!(history.len(), 50);
    let totals: Vec<u64> = history.iter().map(|m| m.total_time).collect();
    assert_eq!(totals, (11..=60).collect::<Vec<_>>());
}

#[test]
fn history_copy_is_detached() {
    let monitor = monitor(&MemoryStore::default(), &ManualClock::new(0));
    monitor.open_session();
    monitor.record_total_time(100);
    monitor.close_session();

    let mut copy = monitor.history();
    copy[0].total_time = 1;
    copy.clear();
    assert_eq!(monitor.history()[0].total_time, 100);
}

#[test]
fn averages_and_report() {
    let monitor = monitor(&MemoryStore::default(), &ManualClock::new(0));
    assert_eq!(monitor.text_report(), NO_DATA_REPORT);
    assert_eq!(monitor.averages().sessions, 0);

    for (search, total, hit) in [(100, 1_000, true), (200, 2_001, true), (301, 3_000, false)] {
        monitor.open_session();
        monitor.record_search_time(search);
        monitor.record_total_time(total);
        monitor.record_source_count(3);
        monitor.record_cache_hit(hit);
        monitor.record_selected_source(format!("src-{total}"));
        monitor.close_session();
    }

    let averages = monitor.averages();
    assert_eq!(averages.avg_search_time, 200);
    assert_eq!(averages.avg_total_time, 2_000);
    assert_eq!(averages.avg_source_count, 3);
    assert!(averages.cache_mostly_hits);

    let report = monitor.text_report();
    assert!(report.contains("Average search time: 200ms"));
    assert!(report.contains("Cache hit rate: high"));
    assert!(report.contains("3. 3000ms via src-3000"));
}

#[test]
fn clear_erases_memory_and_snapshot() {
    let store = MemoryStore::default();
    let monitor = monitor(&store, &ManualClock::new(0));
    monitor.open_session();
    monitor.record_total_time(10);
    monitor.close_session();
    assert!(store.contains(HISTORY_KEY));

    monitor.open_session();
    monitor.record_total_time(20);
    monitor.clear();
    assert!(monitor.history().is_empty());
    assert_eq!(monitor.current_session(), SessionMetrics::default());
    assert!(!store.contains(HISTORY_KEY));
}

#[test]
fn synthetic_history_is_persisted() {
    let store = MemoryStore::default();
    let clock = ManualClock::new(1_700_000_000_000);
    let monitor = monitor(&store, &clock);
    monitor.generate_synthetic_history_with(&mut StdRng::seed_from_u64(1));

    let history = monitor.history();
    assert_eq!(history.len(), 20);
    assert!(history.iter().all(|m| m.total_time >= m.search_time + m.test_time));
    assert!(
        history
            .windows(2)
            .all(|w| w[0].end_time <= w[1].end_time)
    );

    let restored = PerformanceMonitor::load(
        Config::default(),
        Services {
            store: Box::new(store),
            clock: Arc::new(clock),
        },
    );
    assert_eq!(restored.history(), history);
}
