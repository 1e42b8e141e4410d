//! The assembled fraud pattern report.

use sentinel_mining::{AssociationRule, ItemsetRow, MinerComparison};
use serde::Serialize;

use crate::indicators::DatasetThresholds;
use crate::recommendations::Recommendation;
use crate::risk_classifier::{HighRiskPeriod, StoreRisk, TemporalRisk};
use crate::types::Indicator;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_records: usize,
    pub high_risk_records: usize,
    /// Percentage of records that are high risk, 0 when there are none.
    pub high_risk_rate: f64,
    pub mean_fraud_score: f64,
    /// Stores with at least one high-risk record.
    pub stores_with_high_risk: usize,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorCount {
    pub indicator: Indicator,
    pub count: usize,
}

/// Itemsets and rules from one mining algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmResult {
    pub algorithm: &'static str,
    pub frequent_itemsets: Vec<ItemsetRow>,
    pub rules: Vec<AssociationRule>,
    /// Rules meeting both classification thresholds.
    pub suspicious_rules: Vec<AssociationRule>,
    pub top_suspicious: Vec<AssociationRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FraudReport {
    pub summary: ReportSummary,
    pub thresholds: DatasetThresholds,
    pub indicator_counts: Vec<IndicatorCount>,
    pub algorithms: Vec<AlgorithmResult>,
    pub miner_comparison: MinerComparison,
    pub store_risk: Vec<StoreRisk>,
    pub temporal_risk: Vec<TemporalRisk>,
    pub high_risk_periods: Vec<HighRiskPeriod>,
    pub recommendations: Vec<Recommendation>,
}

impl FraudReport {
    pub fn algorithm(&self, name: &str) -> Option<&AlgorithmResult> {
        self.algorithms.iter().find(|a| a.algorithm == name)
    }

    pub fn indicator_count(&self, indicator: Indicator) -> usize {
        self.indicator_counts
            .iter()
            .find(|c| c.indicator == indicator)
            .map_or(0, |c| c.count)
    }
}
