//! Frequent itemsets in canonical order.

use std::collections::HashMap;

use serde::Serialize;

use crate::params::support_of;
use crate::transactions::{bits, mask_names};

/// A set of item columns together with how often it occurs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Itemset {
    /// Bitmask over the transaction set's columns.
    pub mask: u64,
    /// Number of transactions containing every item.
    pub count: usize,
    /// `count / total transactions`.
    pub support: f64,
}

impl Itemset {
    pub fn new(mask: u64, count: usize, total: usize) -> Self {
        Self {
            mask,
            count,
            support: support_of(count, total),
        }
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Column indices, ascending.
    pub fn items(&self) -> Vec<usize> {
        bits(self.mask).collect()
    }

    pub fn contains(&self, other_mask: u64) -> bool {
        self.mask & other_mask == other_mask
    }
}

/// Sort key: size first, then lexicographic over ascending column indices.
fn canonical_key(mask: u64) -> (u32, Vec<usize>) {
    (mask.count_ones(), bits(mask).collect())
}

/// The complete output of one mining run.
///
/// Itemsets are kept in canonical order so results from different
/// algorithms compare equal with `==` when they found the same thing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequentItemsets {
    items: Vec<String>,
    transaction_count: usize,
    itemsets: Vec<Itemset>,
}

/// Serializable view of one itemset with resolved names.
#[derive(Clone, Debug, Serialize)]
pub struct ItemsetRow {
    pub items: Vec<String>,
    pub support: f64,
    pub count: usize,
}

impl FrequentItemsets {
    pub fn new(items: Vec<String>, transaction_count: usize, mut itemsets: Vec<Itemset>) -> Self {
        itemsets.sort_by_cached_key(|s| canonical_key(s.mask));
        itemsets.dedup_by_key(|s| s.mask);
        Self {
            items,
            transaction_count,
            itemsets,
        }
    }

    pub fn empty(items: Vec<String>, transaction_count: usize) -> Self {
        Self::new(items, transaction_count, Vec::new())
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Largest itemset size found, 0 when empty.
    pub fn max_itemset_len(&self) -> usize {
        self.itemsets.iter().map(Itemset::len).max().unwrap_or(0)
    }

    pub fn names(&self, mask: u64) -> Vec<String> {
        mask_names(&self.items, mask)
    }

    /// Map from mask to support, used for rule generation.
    pub fn support_index(&self) -> HashMap<u64, f64> {
        self.itemsets.iter().map(|s| (s.mask, s.support)).collect()
    }

    pub fn get(&self, mask: u64) -> Option<&Itemset> {
        self.itemsets.iter().find(|s| s.mask == mask)
    }

    pub fn to_rows(&self) -> Vec<ItemsetRow> {
        self.itemsets
            .iter()
            .map(|s| ItemsetRow {
                items: self.names(s.mask),
                support: s.support,
                count: s.count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn canonical_order_is_size_then_columns() {
        let sets = FrequentItemsets::new(
            items(),
            4,
            vec![
                Itemset::new(0b110, 1, 4),
                Itemset::new(0b100, 2, 4),
                Itemset::new(0b011, 2, 4),
                Itemset::new(0b001, 3, 4),
            ],
        );
        let masks: Vec<u64> = sets.itemsets().iter().map(|s| s.mask).collect();
        assert_eq!(masks, vec![0b001, 0b100, 0b011, 0b110]);
        assert_eq!(sets.max_itemset_len(), 2);
    }

    #[test]
    fn insertion_order_does_not_affect_equality() {
        let a = FrequentItemsets::new(
            items(),
            2,
            vec![Itemset::new(0b01, 1, 2), Itemset::new(0b10, 2, 2)],
        );
        let b = FrequentItemsets::new(
            items(),
            2,
            vec![Itemset::new(0b10, 2, 2), Itemset::new(0b01, 1, 2)],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn rows_resolve_names() {
        let sets = FrequentItemsets::new(items(), 2, vec![Itemset::new(0b101, 1, 2)]);
        let rows = sets.to_rows();
        assert_eq!(rows[0].items, vec!["a", "c"]);
        assert!((rows[0].support - 0.5).abs() < 1e-12);
    }
}
