//! Correctness tests for sentinel-mining.
//!
//! Validates that:
//! 1. Apriori and FP-Growth return identical (itemset, support) sets
//! 2. The support boundary is inclusive
//! 3. Empty input flows through mining and rule generation without error
//! 4. Rule metrics stay in range and match their definitions
//! 5. Determinism: same inputs always produce the same outputs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_mining::{
    filter_rules, generate_rules, mine_both, Apriori, FpGrowth, ItemsetMiner, MiningParams,
    RuleThreshold, TransactionSet,
};

const SEED: u64 = 42;

fn indicator_names() -> Vec<String> {
    [
        "high_shrinkage",
        "large_discrepancy",
        "high_rtv",
        "zero_sales",
        "high_transfer_out",
        "high_transfer_in",
        "low_accuracy",
        "high_shipment",
        "zero_shipment",
        "store_anomaly",
        "weekend",
        "month_end",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ---------------------------------------------------------------------------
// Helper transaction generators
// ---------------------------------------------------------------------------

/// Random transactions where each item fires with its own probability, and
/// items 0/1 are correlated so multi-item rules exist.
fn synthetic_transactions(count: usize, seed: u64) -> TransactionSet {
    let items = indicator_names();
    let mut rng = StdRng::seed_from_u64(seed);
    let rates: Vec<f64> = (0..items.len()).map(|_| rng.gen_range(0.05..0.6)).collect();
    let rows: Vec<u64> = (0..count)
        .map(|_| {
            let mut mask = 0u64;
            for (col, &rate) in rates.iter().enumerate() {
                if rng.gen_bool(rate) {
                    mask |= 1 << col;
                }
            }
            if mask & 1 != 0 && rng.gen_bool(0.8) {
                mask |= 1 << 1;
            }
            mask
        })
        .collect();
    TransactionSet::from_masks(items, rows).unwrap()
}

/// Ten transactions where `zero_sales` (column 3) appears exactly once.
fn single_zero_sales() -> TransactionSet {
    let mut rows = vec![0b1u64; 10];
    rows[7] |= 1 << 3;
    TransactionSet::from_masks(indicator_names(), rows).unwrap()
}

// ---------------------------------------------------------------------------
// Agreement
// ---------------------------------------------------------------------------

#[test]
fn miners_agree_on_synthetic_data_across_supports() {
    for (i, size) in [1usize, 7, 60, 400].into_iter().enumerate() {
        let tx = synthetic_transactions(size, SEED + i as u64);
        for support in [0.05, 0.1, 0.2, 0.35, 0.6, 1.0] {
            let params = MiningParams::new(support);
            let pair = mine_both(&tx, &params).unwrap();
            assert_eq!(
                pair.apriori, pair.fpgrowth,
                "miners disagree: transactions={size} min_support={support}"
            );
            assert!(pair.comparison().identical);
        }
    }
}

#[test]
fn miners_agree_with_max_len() {
    let tx = synthetic_transactions(300, SEED);
    for max_len in 1..=4 {
        let params = MiningParams::new(0.05).with_max_len(max_len);
        let ap = Apriori.mine(&tx, &params).unwrap();
        let fp = FpGrowth.mine(&tx, &params).unwrap();
        assert_eq!(ap, fp, "max_len={max_len}");
        assert!(ap.max_itemset_len() <= max_len);
    }
}

#[test]
fn supports_match_direct_counts() {
    let tx = synthetic_transactions(250, SEED);
    let result = FpGrowth.mine(&tx, &MiningParams::new(0.1)).unwrap();
    assert!(!result.is_empty());
    for itemset in result.itemsets() {
        assert_eq!(itemset.count, tx.count_containing(itemset.mask));
        assert!(itemset.support >= 0.1);
    }
}

// ---------------------------------------------------------------------------
// Boundaries and empty input
// ---------------------------------------------------------------------------

#[test]
fn support_equal_to_threshold_is_retained() {
    let tx = single_zero_sales();
    for miner in [&Apriori as &dyn ItemsetMiner, &FpGrowth] {
        let result = miner.mine(&tx, &MiningParams::new(0.1)).unwrap();
        let zero_sales = result
            .get(1 << 3)
            .unwrap_or_else(|| panic!("{} dropped {{zero_sales}}", miner.name()));
        assert_eq!(zero_sales.support, 0.1);
        assert_eq!(result.names(zero_sales.mask), vec!["zero_sales"]);
    }
}

#[test]
fn zero_transactions_flow_through_to_zero_rules() {
    let tx = TransactionSet::from_masks(indicator_names(), vec![]).unwrap();
    let pair = mine_both(&tx, &MiningParams::default()).unwrap();
    assert!(pair.apriori.is_empty());
    assert!(pair.fpgrowth.is_empty());
    let rules = generate_rules(&pair.apriori, &RuleThreshold::default()).unwrap();
    assert!(rules.is_empty());
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[test]
fn rule_metrics_are_bounded_and_exact() {
    let tx = synthetic_transactions(400, SEED);
    let frequent = Apriori.mine(&tx, &MiningParams::new(0.05)).unwrap();
    let rules = generate_rules(&frequent, &RuleThreshold::confidence(0.0)).unwrap();
    assert!(!rules.is_empty());
    for rule in &rules {
        assert!((0.0..=1.0).contains(&rule.support));
        assert!((0.0..=1.0).contains(&rule.confidence));
        assert!(rule.lift >= 0.0);
        let itemset_support = frequent
            .get(rule.antecedent_mask | rule.consequent_mask)
            .unwrap()
            .support;
        let antecedent_support = frequent.get(rule.antecedent_mask).unwrap().support;
        assert_eq!(rule.confidence, itemset_support / antecedent_support);
        assert_eq!(rule.antecedent_mask & rule.consequent_mask, 0);
    }
}

#[test]
fn rule_tables_match_between_miners() {
    let tx = synthetic_transactions(200, SEED + 9);
    let pair = mine_both(&tx, &MiningParams::new(0.1)).unwrap();
    let threshold = RuleThreshold::default();
    assert_eq!(
        generate_rules(&pair.apriori, &threshold).unwrap(),
        generate_rules(&pair.fpgrowth, &threshold).unwrap()
    );
}

#[test]
fn zero_threshold_filter_round_trips() {
    let tx = synthetic_transactions(150, SEED);
    let frequent = FpGrowth.mine(&tx, &MiningParams::new(0.1)).unwrap();
    let rules = generate_rules(&frequent, &RuleThreshold::default()).unwrap();
    let filtered = filter_rules(&rules, 0.0, 0.0);
    assert_eq!(filtered, rules);
    assert_eq!(filter_rules(&filtered, 0.0, 0.0), filtered);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn repeated_runs_are_identical() {
    let tx = synthetic_transactions(120, SEED);
    let params = MiningParams::new(0.1);
    let first = FpGrowth.mine(&tx, &params).unwrap();
    let second = FpGrowth.mine(&tx, &params).unwrap();
    assert_eq!(first, second);
}
