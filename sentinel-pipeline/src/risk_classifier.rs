//! Rule-level, record-level and store-level risk classification.

use std::collections::BTreeMap;

use sentinel_mining::AssociationRule;
use serde::Serialize;

use crate::components::fraud_score_selector::FraudScoreSelector;
use crate::components::rule_quality_filter::RuleQualityFilter;
use crate::components::top_lift_selector::TopLiftSelector;
use crate::filter::Filter;
use crate::indicators::ScoredRecord;
use crate::selector::Selector;
use crate::types::{Indicator, IndicatorVector, RiskBand, RiskCategory, YearMonth};
use crate::util;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Rules split by classification thresholds.
#[derive(Debug, Clone, Serialize)]
pub struct RuleClassification {
    /// Rules meeting both the confidence and the lift threshold, input order.
    pub suspicious: Vec<AssociationRule>,
    /// Number of rules failing either threshold.
    pub rejected: usize,
    /// Suspicious rules ranked by descending lift, truncated to top N.
    pub top_suspicious: Vec<AssociationRule>,
}

pub fn classify_rules(
    rules: &[AssociationRule],
    confidence_threshold: f64,
    lift_threshold: f64,
    top_n: usize,
) -> RuleClassification {
    let filter = RuleQualityFilter::new(confidence_threshold, lift_threshold);
    let filtered = filter.filter(rules.to_vec());
    log::debug!(
        "{}: kept={} removed={}",
        filter.name(),
        filtered.kept.len(),
        filtered.removed.len()
    );

    let selector = TopLiftSelector { n: top_n };
    let top_suspicious = selector.select(filtered.kept.clone());

    RuleClassification {
        rejected: filtered.removed.len(),
        suspicious: filtered.kept,
        top_suspicious,
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A high-risk record with its category and contributing indicators.
#[derive(Debug, Clone, Serialize)]
pub struct HighRiskPeriod {
    pub index: usize,
    pub store: String,
    pub period_start: chrono::NaiveDate,
    pub period_end: chrono::NaiveDate,
    pub fraud_score: u8,
    pub category: RiskCategory,
    /// Scored indicators that fired, joined with " + ".
    pub fraud_types: String,
    pub shrinkage_rate: f64,
    pub discrepancy: f64,
}

/// Names of the true scored indicators in declaration order, joined by " + ".
pub fn fraud_types_label(indicators: &IndicatorVector) -> String {
    Indicator::SCORED
        .iter()
        .filter(|&&i| indicators.get(i))
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Records with score ≥ 3, highest score first, dataset order among ties.
pub fn high_risk_periods(scored: &[ScoredRecord]) -> Vec<HighRiskPeriod> {
    FraudScoreSelector
        .high_risk(scored)
        .into_iter()
        .filter_map(|s| {
            let category = RiskCategory::from_score(s.fraud_score)?;
            Some(HighRiskPeriod {
                index: s.index,
                store: s.store.clone(),
                period_start: s.period_start,
                period_end: s.period_end,
                fraud_score: s.fraud_score,
                category,
                fraud_types: fraud_types_label(&s.indicators),
                shrinkage_rate: s.metrics.shrinkage_rate,
                discrepancy: s.metrics.discrepancy,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregate tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StoreRisk {
    pub store: String,
    pub records: usize,
    pub mean_score: f64,
    pub high_risk_count: usize,
    pub high_shrinkage_count: usize,
    pub large_discrepancy_count: usize,
    /// `None` only for a mean outside [0, 10], which scores cannot produce.
    pub band: Option<RiskBand>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalRisk {
    pub year_month: YearMonth,
    pub records: usize,
    pub mean_score: f64,
    pub high_risk_count: usize,
    pub high_shrinkage_count: usize,
}

#[derive(Default)]
struct Tally {
    records: usize,
    score_sum: f64,
    high_risk: usize,
    high_shrinkage: usize,
    large_discrepancy: usize,
}

impl Tally {
    fn add(&mut self, s: &ScoredRecord) {
        self.records += 1;
        self.score_sum += f64::from(s.fraud_score);
        self.high_risk += usize::from(s.is_high_risk());
        self.high_shrinkage += usize::from(s.indicators.get(Indicator::HighShrinkage));
        self.large_discrepancy += usize::from(s.indicators.get(Indicator::LargeDiscrepancy));
    }

    fn mean(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.score_sum / self.records as f64
        }
    }
}

fn tally_by<K: Ord>(scored: &[ScoredRecord], key: impl Fn(&ScoredRecord) -> K) -> BTreeMap<K, Tally> {
    let mut tallies: BTreeMap<K, Tally> = BTreeMap::new();
    for s in scored {
        tallies.entry(key(s)).or_default().add(s);
    }
    tallies
}

/// Per-store mean score, counts and band, sorted by store id.
pub fn store_risk_table(scored: &[ScoredRecord]) -> Vec<StoreRisk> {
    tally_by(scored, |s| s.store.clone())
        .into_iter()
        .map(|(store, t)| {
            let mean_score = t.mean();
            StoreRisk {
                store,
                records: t.records,
                mean_score,
                high_risk_count: t.high_risk,
                high_shrinkage_count: t.high_shrinkage,
                large_discrepancy_count: t.large_discrepancy,
                band: RiskBand::from_mean_score(mean_score),
            }
        })
        .collect()
}

/// Per calendar month mean score and counts, chronological.
pub fn temporal_risk_table(scored: &[ScoredRecord]) -> Vec<TemporalRisk> {
    tally_by(scored, |s| s.year_month)
        .into_iter()
        .map(|(year_month, t)| TemporalRisk {
            year_month,
            records: t.records,
            mean_score: t.mean(),
            high_risk_count: t.high_risk,
            high_shrinkage_count: t.high_shrinkage,
        })
        .collect()
}

/// Mean score across all records, 0 when empty.
pub fn mean_fraud_score(scored: &[ScoredRecord]) -> f64 {
    util::mean(scored.iter().map(|s| f64::from(s.fraud_score)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DerivedMetrics;
    use chrono::NaiveDate;

    fn scored(index: usize, store: &str, month: u32, on: &[Indicator]) -> ScoredRecord {
        let start = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
        let indicators = on
            .iter()
            .fold(IndicatorVector::default(), |v, &i| v.with(i, true));
        ScoredRecord {
            index,
            store: store.to_string(),
            period_start: start,
            period_end: start,
            year_month: YearMonth::of(start),
            metrics: DerivedMetrics {
                expected_ending: 0.0,
                discrepancy: 0.0,
                shrinkage_rate: 0.0,
                rtv_rate: 0.0,
                accuracy: 100.0,
                turnover: 0.0,
                period_days: 1,
            },
            fraud_score: indicators.fraud_score(),
            indicators,
        }
    }

    const THREE: [Indicator; 3] = [
        Indicator::HighShrinkage,
        Indicator::LargeDiscrepancy,
        Indicator::LowAccuracy,
    ];

    #[test]
    fn label_uses_declaration_order_and_only_scored() {
        let v = IndicatorVector::default()
            .with(Indicator::StoreAnomaly, true)
            .with(Indicator::Weekend, true)
            .with(Indicator::HighShrinkage, true)
            .with(Indicator::ZeroSales, true);
        assert_eq!(
            fraud_types_label(&v),
            "high_shrinkage + zero_sales + store_anomaly"
        );
        assert_eq!(fraud_types_label(&IndicatorVector::default()), "");
    }

    #[test]
    fn high_risk_periods_rank_and_categorize() {
        let records = vec![
            scored(0, "S01", 1, &THREE),
            scored(1, "S01", 2, &[Indicator::HighShrinkage, Indicator::Weekend]),
            scored(
                2,
                "S02",
                1,
                &[
                    Indicator::HighShrinkage,
                    Indicator::LargeDiscrepancy,
                    Indicator::HighRtv,
                    Indicator::ZeroSales,
                    Indicator::StoreAnomaly,
                ],
            ),
            scored(3, "S02", 2, &THREE),
            scored(4, "S03", 1, &[Indicator::HighRtv, Indicator::ZeroSales, Indicator::HighTransferOut, Indicator::LowAccuracy]),
        ];
        let periods = high_risk_periods(&records);
        let order: Vec<_> = periods.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![2, 4, 0, 3]);
        assert_eq!(periods[0].category, RiskCategory::Critical);
        assert_eq!(periods[1].category, RiskCategory::High);
        assert_eq!(periods[2].category, RiskCategory::Medium);
        assert_eq!(
            periods[2].fraud_types,
            "high_shrinkage + large_discrepancy + low_accuracy"
        );
    }

    #[test]
    fn every_high_risk_period_is_listed() {
        let records: Vec<_> = (0..40)
            .map(|i| scored(i, "S01", 1 + (i % 12) as u32, &THREE))
            .collect();
        let periods = high_risk_periods(&records);
        assert_eq!(periods.len(), 40);
        let order: Vec<_> = periods.iter().map(|p| p.index).collect();
        assert_eq!(order, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn store_mean_of_exactly_three_is_very_high() {
        let records = vec![
            scored(0, "S01", 1, &THREE),
            scored(1, "S01", 2, &THREE),
            scored(2, "S02", 1, &[Indicator::HighShrinkage, Indicator::HighRtv]),
            scored(3, "S02", 2, &[]),
        ];
        let table = store_risk_table(&records);
        assert_eq!(table[0].store, "S01");
        assert_eq!(table[0].mean_score, 3.0);
        assert_eq!(table[0].band, Some(RiskBand::VeryHigh));
        assert_eq!(table[0].high_risk_count, 2);
        assert_eq!(table[0].large_discrepancy_count, 2);
        assert_eq!(table[1].mean_score, 1.0);
        assert_eq!(table[1].band, Some(RiskBand::Medium));
        assert_eq!(table[1].high_shrinkage_count, 1);
    }

    #[test]
    fn temporal_table_is_chronological() {
        let records = vec![
            scored(0, "S01", 3, &THREE),
            scored(1, "S02", 1, &[]),
            scored(2, "S01", 1, &[Indicator::HighShrinkage]),
        ];
        let table = temporal_risk_table(&records);
        let months: Vec<_> = table.iter().map(|t| t.year_month.month).collect();
        assert_eq!(months, vec![1, 3]);
        assert_eq!(table[0].records, 2);
        assert_eq!(table[0].mean_score, 0.5);
        assert_eq!(table[0].high_shrinkage_count, 1);
        assert_eq!(table[1].high_risk_count, 1);
        assert!((mean_fraud_score(&records) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rule_classification_filters_then_ranks() {
        use sentinel_mining::{generate_rules, Apriori, ItemsetMiner, MiningParams, RuleThreshold, TransactionSet};

        let tx = TransactionSet::from_masks(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0b011, 0b011, 0b100, 0b100, 0b111, 0b000],
        )
        .unwrap();
        let frequent = Apriori.mine(&tx, &MiningParams::new(0.1)).unwrap();
        let rules = generate_rules(&frequent, &RuleThreshold::default()).unwrap();
        let classified = classify_rules(&rules, 0.7, 1.5, 2);

        assert!(classified.top_suspicious.len() <= 2);
        assert!(classified
            .suspicious
            .iter()
            .all(|r| r.confidence >= 0.7 && r.lift >= 1.5));
        assert!(classified
            .top_suspicious
            .windows(2)
            .all(|w| w[0].lift >= w[1].lift));
        assert_eq!(classified.suspicious.len() + classified.rejected, rules.len());
    }
}
