//! Performance benchmark for sentinel-mining.
//!
//! Generates synthetic store-month transactions over twelve indicators and
//! times Apriori against FP-Growth at several support thresholds, checking
//! that both return the same itemsets.
//!
//! Run with:
//!   cargo run --example benchmark --release -p sentinel-mining

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_mining::{
    generate_rules, Apriori, FpGrowth, ItemsetMiner, MiningParams, RuleThreshold, TransactionSet,
};
use std::time::Instant;

const NUM_TRANSACTIONS: usize = 50_000;
const NUM_ITEMS: usize = 12;
const SEED: u64 = 42;
const SUPPORTS: [f64; 4] = [0.3, 0.1, 0.05, 0.01];

fn main() {
    println!("=== Sentinel-Mining Performance Benchmark ===");
    println!();

    println!("Generating {} synthetic transactions...", NUM_TRANSACTIONS);
    let gen_start = Instant::now();
    let transactions = generate_synthetic_transactions(NUM_TRANSACTIONS, SEED);
    println!(
        "  Data generation: {:.3}s",
        gen_start.elapsed().as_secs_f64()
    );
    println!();

    println!("  ┌──────────┬───────────┬──────────────┬──────────────┬─────────┐");
    println!("  │ support  │ itemsets  │ apriori (s)  │ fpgrowth (s) │ rules   │");
    println!("  ├──────────┼───────────┼──────────────┼──────────────┼─────────┤");

    for &support in &SUPPORTS {
        let params = MiningParams::new(support);

        let ap_start = Instant::now();
        let apriori = Apriori
            .mine(&transactions, &params)
            .expect("benchmark parameters are valid");
        let ap_elapsed = ap_start.elapsed().as_secs_f64();

        let fp_start = Instant::now();
        let fpgrowth = FpGrowth
            .mine(&transactions, &params)
            .expect("benchmark parameters are valid");
        let fp_elapsed = fp_start.elapsed().as_secs_f64();

        assert_eq!(
            apriori, fpgrowth,
            "miners disagree at min_support={}",
            support
        );

        let rules = generate_rules(&apriori, &RuleThreshold::default())
            .expect("default threshold is valid");

        println!(
            "  │ {:>8.2} │ {:>9} │ {:>12.4} │ {:>12.4} │ {:>7} │",
            support,
            apriori.len(),
            ap_elapsed,
            fp_elapsed,
            rules.len()
        );
    }
    println!("  └──────────┴───────────┴──────────────┴──────────────┴─────────┘");
    println!();
    println!("All thresholds: Apriori and FP-Growth results identical.");
}

/// Each indicator fires at its own base rate; a few are chained so that
/// multi-item patterns show up the way correlated fraud signals do.
fn generate_synthetic_transactions(count: usize, seed: u64) -> TransactionSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let items: Vec<String> = (0..NUM_ITEMS).map(|i| format!("indicator_{i}")).collect();
    let rates: Vec<f64> = (0..NUM_ITEMS).map(|_| rng.gen_range(0.02..0.5)).collect();

    let rows = (0..count)
        .map(|_| {
            let mut mask = 0u64;
            for (col, &rate) in rates.iter().enumerate() {
                if rng.gen_bool(rate) {
                    mask |= 1 << col;
                }
            }
            // shrinkage-like signal drags discrepancy and accuracy along
            if mask & 1 != 0 {
                if rng.gen_bool(0.7) {
                    mask |= 1 << 1;
                }
                if rng.gen_bool(0.6) {
                    mask |= 1 << 6;
                }
            }
            mask
        })
        .collect();

    TransactionSet::from_masks(items, rows).expect("twelve items fit in a mask")
}
