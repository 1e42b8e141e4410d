//! Levelwise (Apriori) frequent itemset mining.
//!
//! Level k+1 candidates come from joining frequent k-itemsets that share
//! their first k-1 columns. A candidate survives the prune step only if
//! every k-subset is frequent, then one scan over the transactions counts
//! its support.

use std::collections::HashSet;

use crate::error::MiningResult;
use crate::itemset::{FrequentItemsets, Itemset};
use crate::miner::ItemsetMiner;
use crate::params::MiningParams;
use crate::transactions::{bits, TransactionSet};

/// Breadth-first candidate generation with support pruning.
#[derive(Clone, Copy, Debug, Default)]
pub struct Apriori;

impl ItemsetMiner for Apriori {
    fn name(&self) -> &'static str {
        "apriori"
    }

    fn mine(&self, transactions: &TransactionSet, params: &MiningParams) -> MiningResult<FrequentItemsets> {
        params.validate()?;
        let total = transactions.len();
        let items = transactions.items().to_vec();
        if total == 0 {
            return Ok(FrequentItemsets::empty(items, 0));
        }

        let mut found: Vec<Itemset> = Vec::new();

        // Level 1: single items.
        let mut level: Vec<Itemset> = (0..transactions.item_count())
            .map(|col| 1u64 << col)
            .map(|mask| Itemset::new(mask, transactions.count_containing(mask), total))
            .filter(|s| params.meets_support(s.count, total))
            .collect();

        let mut size = 1;
        while !level.is_empty() {
            log::debug!("apriori level={} frequent={}", size, level.len());
            found.extend(level.iter().copied());
            if !params.can_grow(size) {
                break;
            }

            let candidates = generate_candidates(&level);
            let candidate_count = candidates.len();
            level = candidates
                .into_iter()
                .map(|mask| Itemset::new(mask, transactions.count_containing(mask), total))
                .filter(|s| params.meets_support(s.count, total))
                .collect();
            size += 1;
            log::debug!(
                "apriori level={} candidates={} survivors={}",
                size,
                candidate_count,
                level.len()
            );
        }

        Ok(FrequentItemsets::new(items, total, found))
    }
}

/// Join frequent k-itemsets sharing a (k-1)-prefix, then drop any candidate
/// with an infrequent k-subset.
fn generate_candidates(level: &[Itemset]) -> Vec<u64> {
    let frequent: HashSet<u64> = level.iter().map(|s| s.mask).collect();
    let mut sorted: Vec<Vec<usize>> = level.iter().map(|s| s.items()).collect();
    sorted.sort();

    let mut candidates = Vec::new();
    for (i, left) in sorted.iter().enumerate() {
        let prefix_len = left.len() - 1;
        for right in sorted.iter().skip(i + 1) {
            if left[..prefix_len] != right[..prefix_len] {
                // Sorted order keeps shared prefixes contiguous.
                break;
            }
            let mask = to_mask(left) | to_mask(right);
            if all_subsets_frequent(mask, &frequent) {
                candidates.push(mask);
            }
        }
    }
    candidates
}

fn to_mask(cols: &[usize]) -> u64 {
    cols.iter().fold(0u64, |acc, &col| acc | (1u64 << col))
}

fn all_subsets_frequent(mask: u64, frequent: &HashSet<u64>) -> bool {
    bits(mask).all(|col| frequent.contains(&(mask & !(1u64 << col))))
}
