#![forbid(unsafe_code)]

use crate::domain::{RequestContext, SessionMetrics, SourceSample};
use rand::Rng;

const SESSION_SPACING_MS: u64 = 60_000;
const QUALITIES: [&str; 4] = ["1080p", "720p", "480p", "360p"];
const NETWORK_TYPES: [&str; 3] = ["wifi", "4g", "ethernet"];

/// Plausible random sessions for demos and tests, ending at `now`.
///
/// Every session has `search_time` in 100..=2000 ms, `test_time` in
/// 200..=3000 ms, `total_time` strictly greater than their sum, and between
/// 1 and 8 considered sources.
pub fn synthetic_sessions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: u64,
) -> Vec<SessionMetrics> {
    (0..count)
        .map(|i| {
            let search_time = rng.gen_range(100..=2000);
            let test_time = rng.gen_range(200..=3000);
            let total_time = search_time + test_time + rng.gen_range(50..=1000);
            let start_time = now
                .saturating_sub((count - i) as u64 * SESSION_SPACING_MS)
                .saturating_sub(total_time);

            let source_count = rng.gen_range(1..=8);
            let sources: Vec<SourceSample> = (0..source_count)
                .map(|n| {
                    SourceSample::new(
                        format!("https://cdn{n}.example.com/stream.m3u8"),
                        rng.gen_bool(0.8),
                        rng.gen_range(20..=800),
                        start_time,
                    )
                    .with_quality(QUALITIES[rng.gen_range(0..QUALITIES.len())])
                    .with_cdn_optimized(rng.gen_bool(0.5))
                })
                .collect();
            let selected_source = sources
                .iter()
                .find(|s| s.available)
                .unwrap_or(&sources[0])
                .url
                .clone();

            let mut metrics = SessionMetrics {
                search_time,
                test_time,
                total_time,
                source_count,
                selected_source,
                cache_hit: rng.gen_bool(0.4),
                request: RequestContext {
                    request_id: Some(format!("synthetic-{i}")),
                    video_id: Some(format!("video-{}", rng.gen_range(1..=500))),
                    network_type: Some(
                        NETWORK_TYPES[rng.gen_range(0..NETWORK_TYPES.len())].to_string(),
                    ),
                    final_quality: Some(QUALITIES[rng.gen_range(0..QUALITIES.len())].to_string()),
                    bandwidth_estimate: Some(rng.gen_range(1_000..=20_000)),
                    ..Default::default()
                },
                start_time: Some(start_time),
                end_time: Some(start_time + total_time),
                retry_count: rng.gen_range(0..=2),
                ..Default::default()
            };
            metrics.set_sources_info(sources);
            metrics
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sessions_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let sessions = synthetic_sessions(&mut rng, 20, 10_000_000);
        assert_eq!(sessions.len(), 20);

        for session in &sessions {
            assert!((100..=2000).contains(&session.search_time));
            assert!((200..=3000).contains(&session.test_time));
            assert!(session.total_time > session.search_time + session.test_time);
            assert!((1..=8).contains(&session.source_count));
            assert_eq!(session.sources_info.len(), session.source_count);
            assert!((0.0..=1.0).contains(&session.source_success_rate));
            assert!(session.end_time.unwrap() <= 10_000_000);
            assert!(!session.selected_source.is_empty());
        }
    }

    #[test]
    fn sessions_are_chronological() {
        let mut rng = StdRng::seed_from_u64(11);
        let sessions = synthetic_sessions(&mut rng, 20, 10_000_000);
        let starts: Vec<_> = sessions.iter().map(|s| s.start_time.unwrap()).collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn same_seed_same_sessions() {
        let a = synthetic_sessions(&mut StdRng::seed_from_u64(3), 5, 1_000_000);
        let b = synthetic_sessions(&mut StdRng::seed_from_u64(3), 5, 1_000_000);
        assert_eq!(a, b);
    }
}
