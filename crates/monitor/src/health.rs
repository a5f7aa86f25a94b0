#![forbid(unsafe_code)]

use crate::domain::{LiveSample, PlayerStatus, QualityLevel};
use config::ScoreThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0..=100, higher is better.
    pub score: u32,
    pub level: QualityLevel,
}

impl Default for HealthScore {
    fn default() -> Self {
        Self {
            score: 100,
            level: QualityLevel::Excellent,
        }
    }
}

/// Grade a live sample by subtracting threshold penalties from 100.
pub fn score(sample: &LiveSample, thresholds: &ScoreThresholds) -> HealthScore {
    let mut deductions: u64 = 0;

    deductions += match sample.status {
        PlayerStatus::Error => thresholds.error_status_penalty,
        PlayerStatus::Buffering => thresholds.buffering_status_penalty,
        _ => 0,
    } as u64;

    if sample.latency > thresholds.latency_poor_ms {
        deductions += thresholds.latency_poor_penalty as u64;
    } else if sample.latency > thresholds.latency_fair_ms {
        deductions += thresholds.latency_fair_penalty as u64;
    }

    if sample.buffer_health < thresholds.buffer_low {
        deductions += thresholds.buffer_low_penalty as u64;
    } else if sample.buffer_health < thresholds.buffer_fair {
        deductions += thresholds.buffer_fair_penalty as u64;
    }

    deductions += (sample.error_count as u64 * thresholds.error_penalty as u64)
        .min(thresholds.error_penalty_cap as u64);
    deductions += (sample.retry_count as u64 * thresholds.retry_penalty as u64)
        .min(thresholds.retry_penalty_cap as u64);

    let score = 100u64.saturating_sub(deductions) as u32;
    HealthScore {
        score,
        level: level_for(score),
    }
}

fn level_for(score: u32) -> QualityLevel {
    match score {
        90.. => QualityLevel::Excellent,
        70..=89 => QualityLevel::Good,
        50..=69 => QualityLevel::Fair,
        _ => QualityLevel::Poor,
    }
}
