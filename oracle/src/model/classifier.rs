//! Score-to-trend classification.

use crate::error::{OracleError, Result};
use crate::features::FeatureTriple;
use crate::types::{Prediction, Trend, Weights};

/// The raw dot product is divided by this before thresholds apply.
pub const SCORE_SCALE: i128 = 1_000;

/// Scaled scores strictly above this are `Up`.
pub const UP_THRESHOLD: i128 = 50;

/// Scaled scores strictly below this are `Down`.
pub const DOWN_THRESHOLD: i128 = -50;

pub const CONFIDENCE_CAP: u8 = 100;

/// Dot product of weights and features, rejecting overflow.
pub fn score(weights: &Weights, features: &FeatureTriple) -> Result<i128> {
    weights
        .iter()
        .zip(features.as_array())
        .try_fold(0i128, |acc, (w, f)| {
            let term = w
                .checked_mul(f)
                .ok_or(OracleError::ArithmeticOverflow("score product"))?;
            acc.checked_add(term)
                .ok_or(OracleError::ArithmeticOverflow("score sum"))
        })
}

/// Truncating division toward zero.
pub fn scale(score: i128) -> i128 {
    score / SCORE_SCALE
}

pub fn trend_for(scaled: i128) -> Trend {
    if scaled > UP_THRESHOLD {
        Trend::Up
    } else if scaled < DOWN_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    }
}

pub fn confidence_for(scaled: i128) -> u8 {
    scaled.unsigned_abs().min(u128::from(CONFIDENCE_CAP)) as u8
}

/// Classifies the current weights against one feature snapshot.
pub fn classify(weights: &Weights, features: &FeatureTriple) -> Result<Prediction> {
    let scaled = scale(score(weights, features)?);

    Ok(Prediction {
        trend: trend_for(scaled),
        confidence: confidence_for(scaled),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]
        #[test]
        fn prediction_is_deterministic_and_bounded(
            w in prop::array::uniform3(-1_000_000_000i128..=1_000_000_000i128),
            f in prop::array::uniform3(0i128..1_000),
        ) {
            let features = FeatureTriple::new(f[0], f[1], f[2]);
            let a = classify(&w, &features).unwrap();
            let b = classify(&w, &features).unwrap();

            prop_assert_eq!(a, b);
            prop_assert!(a.confidence <= CONFIDENCE_CAP);

            let scaled = scale(score(&w, &features).unwrap());
            match a.trend {
                Trend::Up => prop_assert!(scaled > 50),
                Trend::Down => prop_assert!(scaled < -50),
                Trend::Stable => prop_assert!((-50..=50).contains(&scaled)),
            }
        }
    }
}
