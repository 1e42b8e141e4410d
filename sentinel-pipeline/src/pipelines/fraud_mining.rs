use std::collections::BTreeSet;

use sentinel_mining::{
    compare, generate_rules, mine_both, FrequentItemsets, RuleThreshold,
};

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::indicators::{indicator_counts, score_records};
use crate::record_loader::{validate_records, ReconciliationRecord};
use crate::recommendations::recommend;
use crate::report::{AlgorithmResult, FraudReport, IndicatorCount, ReportSummary};
use crate::risk_classifier::{
    classify_rules, high_risk_periods, mean_fraud_score, store_risk_table, temporal_risk_table,
};
use crate::transaction_builder::build_transactions;
use crate::util;

/// The stocktake fraud pattern mining pipeline.
///
/// Pipeline flow:
/// 1. Validate config, then records
/// 2. Derive metrics, dataset thresholds, indicators and fraud scores
/// 3. Build one transaction per store-month
/// 4. Mine with Apriori and FP-Growth in parallel
/// 5. Generate rules per algorithm and classify them
/// 6. Rank high-risk periods, build store and temporal tables
/// 7. Derive recommendations
///
/// Holds only configuration; every run starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct FraudMiningPipeline {
    config: PipelineConfig,
}

impl FraudMiningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, records: &[ReconciliationRecord]) -> PipelineResult<FraudReport> {
        self.config.validate()?;
        validate_records(records)?;
        let rule_threshold = RuleThreshold::confidence(self.config.rule_min_confidence);
        rule_threshold.validate()?;

        let (thresholds, scored) = score_records(records);
        let built = build_transactions(&scored)?;

        let mined = mine_both(&built.transactions, &self.config.mining_params())?;
        log::info!(
            "mined itemsets: apriori={} fpgrowth={} min_support={}",
            mined.apriori.len(),
            mined.fpgrowth.len(),
            self.config.min_support
        );
        let comparison = compare("apriori", &mined.apriori, "fpgrowth", &mined.fpgrowth);
        if !comparison.identical {
            log::warn!(
                "miner disagreement: only_apriori={} only_fpgrowth={}",
                comparison.only_left.len(),
                comparison.only_right.len()
            );
        }

        let algorithms = vec![
            self.algorithm_result("apriori", &mined.apriori, &rule_threshold)?,
            self.algorithm_result("fpgrowth", &mined.fpgrowth, &rule_threshold)?,
        ];

        let store_risk = store_risk_table(&scored);
        let recommendations = recommend(&scored, &store_risk);

        let high_risk_records = scored.iter().filter(|s| s.is_high_risk()).count();
        let stores_with_high_risk = scored
            .iter()
            .filter(|s| s.is_high_risk())
            .map(|s| s.store.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let summary = ReportSummary {
            total_records: scored.len(),
            high_risk_records,
            high_risk_rate: util::percent(high_risk_records, scored.len()),
            mean_fraud_score: mean_fraud_score(&scored),
            stores_with_high_risk,
            transaction_count: built.transactions.len(),
        };

        let report = FraudReport {
            summary,
            thresholds,
            indicator_counts: indicator_counts(&scored)
                .into_iter()
                .map(|(indicator, count)| IndicatorCount { indicator, count })
                .collect(),
            algorithms,
            miner_comparison: comparison,
            temporal_risk: temporal_risk_table(&scored),
            high_risk_periods: high_risk_periods(&scored),
            store_risk,
            recommendations,
        };
        log::info!(
            "fraud report: records={} high_risk={} periods={} recommendations={}",
            report.summary.total_records,
            report.summary.high_risk_records,
            report.high_risk_periods.len(),
            report.recommendations.len()
        );
        Ok(report)
    }

    fn algorithm_result(
        &self,
        algorithm: &'static str,
        frequent: &FrequentItemsets,
        rule_threshold: &RuleThreshold,
    ) -> PipelineResult<AlgorithmResult> {
        let rules = generate_rules(frequent, rule_threshold)?;
        let classified = classify_rules(
            &rules,
            self.config.confidence_threshold,
            self.config.lift_threshold,
            self.config.top_n,
        );
        log::info!(
            "rules: algorithm={} total={} suspicious={} rejected={}",
            algorithm,
            rules.len(),
            classified.suspicious.len(),
            classified.rejected
        );
        Ok(AlgorithmResult {
            algorithm,
            frequent_itemsets: frequent.to_rows(),
            rules,
            suspicious_rules: classified.suspicious,
            top_suspicious: classified.top_suspicious,
        })
    }
}
