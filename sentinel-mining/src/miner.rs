//! The miner interface and side-by-side execution.

use serde::Serialize;

use crate::apriori::Apriori;
use crate::error::MiningResult;
use crate::fp_growth::FpGrowth;
use crate::itemset::FrequentItemsets;
use crate::params::MiningParams;
use crate::transactions::TransactionSet;

/// A frequent itemset algorithm.
///
/// Implementations must return the same itemsets and supports for the same
/// input; they differ only in how they search.
pub trait ItemsetMiner: Send + Sync {
    /// Stable name used in reports and logs.
    fn name(&self) -> &'static str;

    /// Find every itemset whose support is at least `params.min_support`.
    ///
    /// Zero transactions yield an empty result. Invalid parameters are
    /// rejected before any work is done.
    fn mine(&self, transactions: &TransactionSet, params: &MiningParams) -> MiningResult<FrequentItemsets>;
}

/// Results of running both algorithms over the same transactions.
#[derive(Clone, Debug)]
pub struct MinedPair {
    pub apriori: FrequentItemsets,
    pub fpgrowth: FrequentItemsets,
}

/// Run Apriori and FP-Growth concurrently on the same immutable input.
pub fn mine_both(transactions: &TransactionSet, params: &MiningParams) -> MiningResult<MinedPair> {
    params.validate()?;
    let (apriori, fpgrowth) = rayon::join(
        || Apriori.mine(transactions, params),
        || FpGrowth.mine(transactions, params),
    );
    Ok(MinedPair {
        apriori: apriori?,
        fpgrowth: fpgrowth?,
    })
}

/// Agreement summary between two mining results.
#[derive(Clone, Debug, Serialize)]
pub struct MinerComparison {
    pub left: &'static str,
    pub right: &'static str,
    pub left_count: usize,
    pub right_count: usize,
    pub identical: bool,
    /// Itemsets (by names) present only on the left, or with a different support.
    pub only_left: Vec<Vec<String>>,
    /// Itemsets (by names) present only on the right, or with a different support.
    pub only_right: Vec<Vec<String>>,
}

/// Compare two results itemset by itemset.
pub fn compare(
    left_name: &'static str,
    left: &FrequentItemsets,
    right_name: &'static str,
    right: &FrequentItemsets,
) -> MinerComparison {
    let differs = |a: &FrequentItemsets, b: &FrequentItemsets| -> Vec<Vec<String>> {
        a.itemsets()
            .iter()
            .filter(|s| b.get(s.mask).map_or(true, |other| other != *s))
            .map(|s| a.names(s.mask))
            .collect()
    };
    let only_left = differs(left, right);
    let only_right = differs(right, left);
    MinerComparison {
        left: left_name,
        right: right_name,
        left_count: left.len(),
        right_count: right.len(),
        identical: left == right,
        only_left,
        only_right,
    }
}

impl MinedPair {
    pub fn comparison(&self) -> MinerComparison {
        compare("apriori", &self.apriori, "fpgrowth", &self.fpgrowth)
    }
}
