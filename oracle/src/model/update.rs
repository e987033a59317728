//! Fixed-rate moving-average update in integer arithmetic.
//!
//! Each weight moves a tenth of the way toward its feature:
//!
//! ```text
//! w' = w + (f - w) / 10
//! ```
//!
//! Division truncates toward zero, so a weight within 9 of its feature never
//! moves again until the feature does.

use crate::error::{OracleError, Result};
use crate::features::FeatureTriple;
use crate::model::store::ModelStore;
use crate::types::Weights;

pub const LEARNING_DIVISOR: i128 = 10;

/// Moves a single weight toward its feature.
pub fn step_weight(weight: i128, feature: i128) -> Result<i128> {
    let delta = feature
        .checked_sub(weight)
        .ok_or(OracleError::ArithmeticOverflow("update delta"))?;

    // Rust integer division truncates toward zero.
    let nudge = delta / LEARNING_DIVISOR;

    weight
        .checked_add(nudge)
        .ok_or(OracleError::ArithmeticOverflow("update add"))
}

/// Moves all three weights toward one feature snapshot.
///
/// Either every weight is computed or an error is returned; the input is never
/// partially rewritten.
pub fn step(weights: &Weights, features: &FeatureTriple) -> Result<Weights> {
    let f = features.as_array();
    Ok([
        step_weight(weights[0], f[0])?,
        step_weight(weights[1], f[1])?,
        step_weight(weights[2], f[2])?,
    ])
}

/// Produces the successor store for an update observed at clock `now`.
///
/// `last_updated` never moves backward, even if `now` lags the stored value.
pub fn advance(store: &ModelStore, features: &FeatureTriple, now: u64) -> Result<ModelStore> {
    let weights = step(&store.weights, features)?;
    let update_count = store
        .update_count
        .checked_add(1)
        .ok_or(OracleError::ArithmeticOverflow("update counter"))?;

    Ok(ModelStore {
        weights,
        last_updated: now.max(store.last_updated),
        update_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_from_default_weights() {
        let next = step(&[1, 0, 0], &FeatureTriple::new(500, 200, 10)).unwrap();
        // 1+(499/10)=50, 0+(200/10)=20, 0+(10/10)=1
        assert_eq!(next, [50, 20, 1]);
    }

    #[test]
    fn stalls_when_within_nine_of_feature() {
        assert_eq!(step_weight(100, 109).unwrap(), 100);
        assert_eq!(step_weight(100, 91).unwrap(), 100);
        assert_eq!(step_weight(100, 110).unwrap(), 101);
        assert_eq!(step_weight(100, 90).unwrap(), 99);
    }

    #[test]
    fn negative_delta_truncates_toward_zero() {
        // (0 - 25) / 10 = -2, not -3
        assert_eq!(step_weight(25, 0).unwrap(), 23);
        // negative weights converge upward
        assert_eq!(step_weight(-100, 0).unwrap(), -90);
    }

    #[test]
    fn delta_overflow_is_rejected() {
        let err = step_weight(i128::MIN, 500).unwrap_err();
        assert_eq!(err, OracleError::ArithmeticOverflow("update delta"));
    }

    #[test]
    fn overflow_in_last_weight_rejects_whole_step() {
        let weights = [1, 0, i128::MIN];
        let r = step(&weights, &FeatureTriple::new(500, 200, 10));
        assert!(matches!(r, Err(OracleError::ArithmeticOverflow(_))));
    }

    #[test]
    fn advance_bumps_bookkeeping() {
        let store = ModelStore::genesis(1_000);
        let next = advance(&store, &FeatureTriple::new(500, 200, 10), 1_012).unwrap();

        assert_eq!(next.weights, [50, 20, 1]);
        assert_eq!(next.last_updated, 1_012);
        assert_eq!(next.update_count, 1);
        // input untouched
        assert_eq!(store, ModelStore::genesis(1_000));
    }

    #[test]
    fn lagging_clock_keeps_last_updated() {
        let store = ModelStore::genesis(1_700_000_480);
        let next = advance(&store, &FeatureTriple::new(0, 0, 0), 1_700_000_000).unwrap();

        assert_eq!(next.last_updated, 1_700_000_480);
        assert_eq!(next.update_count, 1);
    }

    #[test]
    fn counter_overflow_is_rejected() {
        let store = ModelStore {
            weights: [0, 0, 0],
            last_updated: 0,
            update_count: u64::MAX,
        };
        let r = advance(&store, &FeatureTriple::new(0, 0, 0), 1);
        assert_eq!(r, Err(OracleError::ArithmeticOverflow("update counter")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]
        #[test]
        fn step_never_overshoots_and_stalls_inside_band(
            weight in -1_000_000_000i128..=1_000_000_000i128,
            feature in 0i128..1_000,
        ) {
            let next = step_weight(weight, feature).unwrap();

            // --- INVARIANT 1: the weight never crosses the feature ---
            if weight <= feature {
                prop_assert!(next >= weight && next <= feature);
            } else {
                prop_assert!(next <= weight && next >= feature);
            }

            // --- INVARIANT 2: inside the band nothing moves ---
            if (feature - weight).abs() < 10 {
                prop_assert_eq!(next, weight);
            } else {
                prop_assert_ne!(next, weight);
            }
        }

        #[test]
        fn advance_counts_exactly_one(
            w in prop::array::uniform3(-1_000_000i128..=1_000_000i128),
            f in prop::array::uniform3(0i128..1_000),
            count in 0u64..u64::MAX,
            now in any::<u64>(),
        ) {
            let store = ModelStore { weights: w, last_updated: 0, update_count: count };
            let next = advance(&store, &FeatureTriple::new(f[0], f[1], f[2]), now).unwrap();

            prop_assert_eq!(next.update_count, count + 1);
            prop_assert_eq!(next.last_updated, now);

            let lagging = advance(&next, &FeatureTriple::new(f[0], f[1], f[2]), now / 2);
            if let Ok(later) = lagging {
                prop_assert!(later.last_updated >= next.last_updated);
            }
        }
    }
}
