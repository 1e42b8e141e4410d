use proptest::prelude::*;
use sentinel_pipeline::{Indicator, IndicatorVector, RiskBand};

fn vector(bits: u16) -> IndicatorVector {
    Indicator::ALL
        .iter()
        .fold(IndicatorVector::default(), |v, &i| {
            v.with(i, bits & (1 << i.index()) != 0)
        })
}

proptest! {
    #[test]
    fn fraud_score_counts_the_seven_scored_indicators(bits in 0u16..(1 << 12)) {
        let v = vector(bits);
        let expected = Indicator::SCORED.iter().filter(|&&i| v.get(i)).count();
        prop_assert!(v.fraud_score() <= 7);
        prop_assert_eq!(usize::from(v.fraud_score()), expected);
    }

    #[test]
    fn unscored_indicators_never_move_the_score(bits in 0u16..(1 << 12), noise in 0u16..(1 << 12)) {
        let base = vector(bits);
        let mut noisy = base;
        for i in Indicator::ALL.iter().filter(|i| !i.is_scored()) {
            noisy.set(*i, noise & (1 << i.index()) != 0);
        }
        prop_assert_eq!(base.fraud_score(), noisy.fraud_score());
    }

    #[test]
    fn every_possible_store_mean_has_a_band(mean in 0.0f64..=7.0) {
        prop_assert!(RiskBand::from_mean_score(mean).is_some());
    }
}
