//! FP-Growth frequent itemset mining.
//!
//! Transactions are compressed into a prefix tree whose paths list items in
//! descending frequency, so transactions sharing their most common items
//! share nodes. Itemsets are then grown depth-first from conditional trees
//! built out of each item's prefix paths, without rescanning the
//! transaction set.

use std::collections::BTreeMap;

use crate::error::MiningResult;
use crate::itemset::{FrequentItemsets, Itemset};
use crate::miner::ItemsetMiner;
use crate::params::MiningParams;
use crate::transactions::{bits, TransactionSet};

/// Compressed prefix-tree, depth-first miner.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpGrowth;

impl ItemsetMiner for FpGrowth {
    fn name(&self) -> &'static str {
        "fpgrowth"
    }

    fn mine(&self, transactions: &TransactionSet, params: &MiningParams) -> MiningResult<FrequentItemsets> {
        params.validate()?;
        let total = transactions.len();
        let items = transactions.items().to_vec();
        if total == 0 {
            return Ok(FrequentItemsets::empty(items, 0));
        }

        // Identical transactions collapse into one weighted path.
        let mut distinct: BTreeMap<u64, usize> = BTreeMap::new();
        for &row in transactions.rows() {
            *distinct.entry(row).or_insert(0) += 1;
        }
        let paths: Vec<(Vec<usize>, usize)> = distinct
            .into_iter()
            .map(|(mask, weight)| (bits(mask).collect(), weight))
            .collect();

        let tree = FpTree::build(&paths, params, total);
        log::debug!(
            "fpgrowth distinct_paths={} tree_nodes={} frequent_items={}",
            paths.len(),
            tree.nodes.len(),
            tree.header.len()
        );

        let mut found = Vec::new();
        tree.grow(0, params, total, &mut found);
        Ok(FrequentItemsets::new(items, total, found))
    }
}

#[derive(Debug)]
struct FpNode {
    item: usize,
    count: usize,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Header table entry: one frequent item and every node that carries it.
#[derive(Debug)]
struct HeaderEntry {
    item: usize,
    count: usize,
    nodes: Vec<usize>,
}

#[derive(Debug)]
struct FpTree {
    /// Node 0 is the root and carries no item.
    nodes: Vec<FpNode>,
    /// Frequent items in descending frequency, ties by column.
    header: Vec<HeaderEntry>,
}

impl FpTree {
    /// Build a tree from weighted item paths, keeping only items that meet
    /// the support threshold within these paths.
    fn build(paths: &[(Vec<usize>, usize)], params: &MiningParams, total: usize) -> Self {
        let mut item_counts: BTreeMap<usize, usize> = BTreeMap::new();
        for (path, weight) in paths {
            for &item in path {
                *item_counts.entry(item).or_insert(0) += weight;
            }
        }

        let mut ranked: Vec<(usize, usize)> = item_counts
            .into_iter()
            .filter(|&(_, count)| params.meets_support(count, total))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut rank_of: BTreeMap<usize, usize> = BTreeMap::new();
        for (rank, &(item, _)) in ranked.iter().enumerate() {
            rank_of.insert(item, rank);
        }

        let mut tree = Self {
            nodes: vec![FpNode {
                item: usize::MAX,
                count: 0,
                parent: None,
                children: Vec::new(),
            }],
            header: ranked
                .iter()
                .map(|&(item, count)| HeaderEntry {
                    item,
                    count,
                    nodes: Vec::new(),
                })
                .collect(),
        };

        for (path, weight) in paths {
            let mut ordered: Vec<(usize, usize)> = path
                .iter()
                .filter_map(|item| rank_of.get(item).map(|&rank| (rank, *item)))
                .collect();
            ordered.sort_unstable();
            tree.insert(&ordered, *weight);
        }
        tree
    }

    /// Insert one ranked path with the given weight.
    fn insert(&mut self, ordered: &[(usize, usize)], weight: usize) {
        let mut current = 0;
        for &(rank, item) in ordered {
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].item == item);
            current = match existing {
                Some(child) => {
                    self.nodes[child].count += weight;
                    child
                }
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(FpNode {
                        item,
                        count: weight,
                        parent: Some(current),
                        children: Vec::new(),
                    });
                    self.nodes[current].children.push(idx);
                    self.header[rank].nodes.push(idx);
                    idx
                }
            };
        }
    }

    /// Items on the path from `node` up to (not including) the root.
    fn prefix_path(&self, node: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = self.nodes[node].parent;
        while let Some(idx) = cursor {
            if idx == 0 {
                break;
            }
            path.push(self.nodes[idx].item);
            cursor = self.nodes[idx].parent;
        }
        path
    }

    /// Emit every frequent itemset that extends `suffix` with items from
    /// this tree, least frequent item first.
    fn grow(&self, suffix: u64, params: &MiningParams, total: usize, found: &mut Vec<Itemset>) {
        for entry in self.header.iter().rev() {
            let mask = suffix | (1u64 << entry.item);
            found.push(Itemset::new(mask, entry.count, total));

            if !params.can_grow(mask.count_ones() as usize) {
                continue;
            }

            let base: Vec<(Vec<usize>, usize)> = entry
                .nodes
                .iter()
                .map(|&node| (self.prefix_path(node), self.nodes[node].count))
                .filter(|(path, _)| !path.is_empty())
                .collect();
            if base.is_empty() {
                continue;
            }

            let conditional = FpTree::build(&base, params, total);
            if !conditional.header.is_empty() {
                conditional.grow(mask, params, total, found);
            }
        }
    }
}
