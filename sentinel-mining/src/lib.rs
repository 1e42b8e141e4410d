//! Frequent itemset mining and association rules over binary transactions.
//!
//! Two result-equivalent miners are provided side by side, levelwise
//! [`Apriori`] and tree-based [`FpGrowth`], behind the [`ItemsetMiner`]
//! trait. Rules are derived from either result with [`generate_rules`].

pub mod apriori;
pub mod error;
pub mod fp_growth;
pub mod itemset;
pub mod miner;
pub mod params;
pub mod rules;
pub mod transactions;

pub use apriori::Apriori;
pub use error::{MiningError, MiningResult};
pub use fp_growth::FpGrowth;
pub use itemset::{FrequentItemsets, Itemset, ItemsetRow};
pub use miner::{compare, mine_both, ItemsetMiner, MinedPair, MinerComparison};
pub use params::{MiningParams, DEFAULT_MIN_SUPPORT, DEFAULT_RULE_MIN_CONFIDENCE};
pub use rules::{filter_rules, generate_rules, AssociationRule, RuleMetric, RuleThreshold};
pub use transactions::{TransactionSet, MAX_ITEMS};
