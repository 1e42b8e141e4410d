//! Binary transaction sets.
//!
//! A transaction is a bitmask over a fixed, ordered list of item names.
//! The column order is set once at construction and never changes, so an
//! itemset mask means the same thing to every miner reading the set.

use serde::Serialize;

use crate::error::{MiningError, MiningResult};

/// Largest number of distinct items a transaction set can hold.
pub const MAX_ITEMS: usize = 64;

/// An immutable set of binary transactions over named items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionSet {
    items: Vec<String>,
    rows: Vec<u64>,
}

impl TransactionSet {
    /// Build from boolean rows, one column per item.
    pub fn from_bool_rows(items: Vec<String>, rows: &[Vec<bool>]) -> MiningResult<Self> {
        check_item_count(&items)?;
        let mut masks = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != items.len() {
                return Err(MiningError::RaggedRow {
                    row: row_idx,
                    found: row.len(),
                    expected: items.len(),
                });
            }
            let mask = row
                .iter()
                .enumerate()
                .filter(|(_, present)| **present)
                .fold(0u64, |acc, (col, _)| acc | (1u64 << col));
            masks.push(mask);
        }
        Ok(Self { items, rows: masks })
    }

    /// Build from precomputed bitmasks. Bits above the item count are cleared.
    pub fn from_masks(items: Vec<String>, rows: Vec<u64>) -> MiningResult<Self> {
        check_item_count(&items)?;
        let universe = universe_mask(items.len());
        let rows = rows.into_iter().map(|r| r & universe).collect();
        Ok(Self { items, rows })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of transactions containing every item in `mask`.
    pub fn count_containing(&self, mask: u64) -> usize {
        self.rows.iter().filter(|&&row| row & mask == mask).count()
    }

    /// Fraction of transactions containing every item in `mask`.
    pub fn support(&self, mask: u64) -> f64 {
        crate::params::support_of(self.count_containing(mask), self.len())
    }

    /// Resolve a mask into item names, in column order.
    pub fn names(&self, mask: u64) -> Vec<String> {
        mask_names(&self.items, mask)
    }
}

pub(crate) fn mask_names(items: &[String], mask: u64) -> Vec<String> {
    bits(mask)
        .filter_map(|col| items.get(col).cloned())
        .collect()
}

/// Iterate the set bit positions of a mask in ascending order.
pub fn bits(mask: u64) -> impl Iterator<Item = usize> {
    let mut remaining = mask;
    std::iter::from_fn(move || {
        if remaining == 0 {
            None
        } else {
            let col = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            Some(col)
        }
    })
}

fn universe_mask(item_count: usize) -> u64 {
    if item_count >= MAX_ITEMS {
        u64::MAX
    } else {
        (1u64 << item_count) - 1
    }
}

fn check_item_count(items: &[String]) -> MiningResult<()> {
    if items.len() > MAX_ITEMS {
        Err(MiningError::TooManyItems(items.len()))
    } else {
        Ok(())
    }
}
