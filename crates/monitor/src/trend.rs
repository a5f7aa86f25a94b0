#![forbid(unsafe_code)]

//! Two-half average-delta trend heuristic.
//!
//! A sequence is split at `len / 2` (the second half receives the extra
//! element of an odd-length input), each half is averaged, and the percentage
//! change between the averages is classified against a fixed ±10% band.

use serde::{Deserialize, Serialize};

/// Percentage change beyond which a sequence counts as rising or falling.
pub const TREND_THRESHOLD_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Split at `len / 2`; odd lengths put the extra element in the second half.
pub fn halves(values: &[f64]) -> (&[f64], &[f64]) {
    values.split_at(values.len() / 2)
}

/// `(second_mean - first_mean) / first_mean * 100`, or `None` for fewer than
/// two values.
///
/// A zero first-half mean follows IEEE division: infinite for a non-zero
/// second half, NaN when both halves are zero.
pub fn percent_change(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let (first, second) = halves(values);
    let first_mean = mean(first);
    let second_mean = mean(second);
    Some((second_mean - first_mean) / first_mean * 100.0)
}

pub fn classify(values: &[f64]) -> Trend {
    match percent_change(values) {
        Some(change) if change > TREND_THRESHOLD_PERCENT => Trend::Rising,
        Some(change) if change < -TREND_THRESHOLD_PERCENT => Trend::Falling,
        _ => Trend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classifies_reference_sequences() {
        assert_eq!(classify(&[1., 1., 1., 1., 10., 10., 10., 10.]), Trend::Rising);
        assert_eq!(classify(&[10., 10., 10., 10., 1., 1., 1., 1.]), Trend::Falling);
        assert_eq!(classify(&[5., 5., 5., 5., 5., 5.]), Trend::Stable);
        assert_eq!(classify(&[42.]), Trend::Stable);
        assert_eq!(classify(&[]), Trend::Stable);
    }

    #[test]
    fn odd_length_gives_extra_element_to_second_half() {
        let (first, second) = halves(&[1., 2., 3., 4., 5.]);
        assert_eq!(first, &[1., 2.]);
        assert_eq!(second, &[3., 4., 5.]);
        // first mean 1.5, second mean 4.0
        let change = percent_change(&[1., 2., 3., 4., 5.]).unwrap();
        assert!((change - 166.666_666_666_666_66).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(classify(&[100., 110.]), Trend::Stable);
        assert_eq!(classify(&[100., 90.]), Trend::Stable);
        assert_eq!(classify(&[100., 110.5]), Trend::Rising);
        assert_eq!(classify(&[100., 89.5]), Trend::Falling);
    }

    #[test]
    fn zero_first_half() {
        assert_eq!(percent_change(&[0., 5.]), Some(f64::INFINITY));
        assert_eq!(classify(&[0., 5.]), Trend::Rising);
        assert!(percent_change(&[0., 0.]).unwrap().is_nan());
        assert_eq!(classify(&[0., 0.]), Trend::Stable);
    }

    proptest! {
        #[test]
        fn constant_sequences_are_stable(value in 0.0f64..1e6, len in 0usize..64) {
            let values = vec![value; len];
            prop_assert_eq!(classify(&values), Trend::Stable);
        }

        #[test]
        fn doubling_second_half_rises(value in 1.0f64..1e6, half in 1usize..32) {
            let mut values = vec![value; half];
            values.extend(std::iter::repeat_n(value * 2.0, half));
            prop_assert_eq!(classify(&values), Trend::Rising);
        }
    }
}
