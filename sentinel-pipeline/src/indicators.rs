//! Indicator derivation and composite fraud scoring.
//!
//! Global cutoffs (quantiles, per-store baselines) are computed once per run
//! into `DatasetThresholds` and passed into the per-record derivation, which
//! is otherwise a pure function of one record.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::metrics::DerivedMetrics;
use crate::record_loader::ReconciliationRecord;
use crate::thresholds::{
    HIGH_RISK_SCORE, HIGH_RTV_RATE, HIGH_SHRINKAGE_RATE, HIGH_VOLUME_QUANTILE,
    LARGE_DISCREPANCY_UNITS, LOW_ACCURACY_PCT, MONTH_END_FIRST_DAY, STORE_ANOMALY_MULTIPLIER,
};
use crate::types::{Indicator, IndicatorVector, YearMonth};

/// Dataset-wide cutoffs for the relative indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetThresholds {
    pub transfer_out_cutoff: f64,
    pub transfer_in_cutoff: f64,
    pub shipment_cutoff: f64,
    /// Mean shrinkage rate per store.
    pub store_mean_shrinkage: BTreeMap<String, f64>,
}

impl DatasetThresholds {
    /// `metrics` must be index-aligned with `records`.
    pub fn compute(records: &[ReconciliationRecord], metrics: &[DerivedMetrics]) -> Self {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for (record, m) in records.iter().zip(metrics) {
            let entry = sums.entry(record.store.clone()).or_insert((0.0, 0));
            entry.0 += m.shrinkage_rate;
            entry.1 += 1;
        }
        let store_mean_shrinkage = sums
            .into_iter()
            .map(|(store, (sum, n))| (store, sum / n as f64))
            .collect();

        let thresholds = Self {
            transfer_out_cutoff: quantile(&column(records, |r| r.transfer_out), HIGH_VOLUME_QUANTILE),
            transfer_in_cutoff: quantile(&column(records, |r| r.transfer_in), HIGH_VOLUME_QUANTILE),
            shipment_cutoff: quantile(&column(records, |r| r.shipment), HIGH_VOLUME_QUANTILE),
            store_mean_shrinkage,
        };
        log::debug!(
            "dataset thresholds: transfer_out={:.2} transfer_in={:.2} shipment={:.2} stores={}",
            thresholds.transfer_out_cutoff,
            thresholds.transfer_in_cutoff,
            thresholds.shipment_cutoff,
            thresholds.store_mean_shrinkage.len()
        );
        thresholds
    }

    fn is_store_anomaly(&self, store: &str, shrinkage_rate: f64) -> bool {
        self.store_mean_shrinkage
            .get(store)
            .is_some_and(|mean| shrinkage_rate > mean * STORE_ANOMALY_MULTIPLIER)
    }
}

fn column(records: &[ReconciliationRecord], f: impl Fn(&ReconciliationRecord) -> f64) -> Vec<f64> {
    records.iter().map(f).collect()
}

/// Quantile with linear interpolation between the closest ranks.
/// Empty input yields 0.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (position - lower as f64) * (sorted[upper] - sorted[lower])
}

/// All twelve indicators for one record.
pub fn derive_indicators(
    record: &ReconciliationRecord,
    metrics: &DerivedMetrics,
    thresholds: &DatasetThresholds,
) -> IndicatorVector {
    let start = record.period_start;
    IndicatorVector::default()
        .with(Indicator::HighShrinkage, metrics.shrinkage_rate > HIGH_SHRINKAGE_RATE)
        .with(
            Indicator::LargeDiscrepancy,
            metrics.discrepancy.abs() > LARGE_DISCREPANCY_UNITS,
        )
        .with(Indicator::HighRtv, metrics.rtv_rate > HIGH_RTV_RATE)
        .with(Indicator::ZeroSales, record.sales == 0.0)
        .with(
            Indicator::HighTransferOut,
            record.transfer_out > thresholds.transfer_out_cutoff,
        )
        .with(
            Indicator::HighTransferIn,
            record.transfer_in > thresholds.transfer_in_cutoff,
        )
        .with(Indicator::LowAccuracy, metrics.accuracy < LOW_ACCURACY_PCT)
        .with(Indicator::HighShipment, record.shipment > thresholds.shipment_cutoff)
        .with(Indicator::ZeroShipment, record.shipment == 0.0)
        .with(
            Indicator::StoreAnomaly,
            thresholds.is_store_anomaly(&record.store, metrics.shrinkage_rate),
        )
        .with(Indicator::Weekend, is_weekend(start))
        .with(Indicator::MonthEnd, start.day() >= MONTH_END_FIRST_DAY)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A record with its derived metrics, indicators and fraud score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    /// Position in the input dataset.
    pub index: usize,
    pub store: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub year_month: YearMonth,
    pub metrics: DerivedMetrics,
    pub indicators: IndicatorVector,
    pub fraud_score: u8,
}

impl ScoredRecord {
    pub fn is_high_risk(&self) -> bool {
        self.fraud_score >= HIGH_RISK_SCORE
    }
}

/// Derive metrics, dataset thresholds, indicators and scores for a dataset.
pub fn score_records(records: &[ReconciliationRecord]) -> (DatasetThresholds, Vec<ScoredRecord>) {
    let metrics = crate::metrics::derive_metrics(records);
    let thresholds = DatasetThresholds::compute(records, &metrics);

    let scored: Vec<ScoredRecord> = records
        .iter()
        .zip(&metrics)
        .enumerate()
        .map(|(index, (record, m))| {
            let indicators = derive_indicators(record, m, &thresholds);
            ScoredRecord {
                index,
                store: record.store.clone(),
                period_start: record.period_start,
                period_end: record.period_end,
                year_month: YearMonth::of(record.period_start),
                metrics: *m,
                fraud_score: indicators.fraud_score(),
                indicators,
            }
        })
        .collect();

    log::info!(
        "scored records: count={} high_risk={}",
        scored.len(),
        scored.iter().filter(|s| s.is_high_risk()).count()
    );
    (thresholds, scored)
}

/// Per-indicator true counts across records, in declaration order.
pub fn indicator_counts(scored: &[ScoredRecord]) -> Vec<(Indicator, usize)> {
    Indicator::ALL
        .iter()
        .map(|&indicator| {
            let count = scored.iter().filter(|s| s.indicators.get(indicator)).count();
            (indicator, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(store: &str, start: (i32, u32, u32)) -> ReconciliationRecord {
        let period_start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        ReconciliationRecord {
            store: store.to_string(),
            period_start,
            period_end: period_start + chrono::Duration::days(13),
            beginning_inventory: 1000.0,
            shipment: 100.0,
            transfer_in: 0.0,
            transfer_out: 0.0,
            rtv: 0.0,
            sales: 100.0,
            ending_inventory: 1000.0,
            inventory_discrepancy: None,
            shrinkage_rate: None,
        }
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert!((quantile(&values, 0.9) - 9.1).abs() < 1e-12);
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 10.0);
        assert_eq!(quantile(&[4.0], 0.9), 4.0);
        assert_eq!(quantile(&[], 0.9), 0.0);
    }

    #[test]
    fn shrinkage_boundary_is_strict() {
        // inflow 1000: ending 980 against expected 1000 is exactly 2.0%.
        let mut r = record("S01", (2024, 1, 3));
        r.beginning_inventory = 900.0;
        r.ending_inventory = 880.0;
        let m = DerivedMetrics::of(&r);
        assert_eq!(m.shrinkage_rate, 2.0);
        let t = DatasetThresholds::compute(std::slice::from_ref(&r), &[m]);
        assert!(!derive_indicators(&r, &m, &t).get(Indicator::HighShrinkage));

        r.ending_inventory = 879.0;
        let m = DerivedMetrics::of(&r);
        let t = DatasetThresholds::compute(std::slice::from_ref(&r), &[m]);
        assert!(derive_indicators(&r, &m, &t).get(Indicator::HighShrinkage));
    }

    #[test]
    fn calendar_indicators_use_period_start() {
        // 2024-01-27 is a Saturday.
        let r = record("S01", (2024, 1, 27));
        let m = DerivedMetrics::of(&r);
        let t = DatasetThresholds::compute(std::slice::from_ref(&r), &[m]);
        let v = derive_indicators(&r, &m, &t);
        assert!(v.get(Indicator::Weekend));
        assert!(v.get(Indicator::MonthEnd));

        let r = record("S01", (2024, 1, 24));
        let v = derive_indicators(&r, &m, &t);
        assert!(!v.get(Indicator::Weekend));
        assert!(!v.get(Indicator::MonthEnd));
    }

    #[test]
    fn volume_indicators_use_global_quantiles() {
        let mut records: Vec<_> = (1..=10).map(|d| record("S01", (2024, 3, d))).collect();
        for (i, r) in records.iter_mut().enumerate() {
            r.transfer_out = (i + 1) as f64 * 10.0;
            r.shipment = if i == 0 { 0.0 } else { 100.0 };
        }
        let (thresholds, scored) = score_records(&records);
        assert!((thresholds.transfer_out_cutoff - 91.0).abs() < 1e-9);
        let flagged: Vec<_> = scored
            .iter()
            .filter(|s| s.indicators.get(Indicator::HighTransferOut))
            .map(|s| s.index)
            .collect();
        assert_eq!(flagged, vec![9]);
        assert!(scored[0].indicators.get(Indicator::ZeroShipment));
        assert!(!scored.iter().any(|s| s.indicators.get(Indicator::HighShipment)));
    }

    #[test]
    fn store_anomaly_compares_against_own_store_mean() {
        let mut records = vec![
            record("S01", (2024, 1, 1)),
            record("S01", (2024, 2, 1)),
            record("S01", (2024, 3, 1)),
            record("S02", (2024, 1, 1)),
        ];
        // S01 shrinkage 1%, 1%, 7%; mean 3%, so only 7% is anomalous.
        records[0].ending_inventory = 989.0;
        records[1].ending_inventory = 989.0;
        records[2].ending_inventory = 923.0;
        // S02 shrinkage 7% is its own mean and is not anomalous.
        records[3].ending_inventory = 923.0;

        let (thresholds, scored) = score_records(&records);
        assert!((thresholds.store_mean_shrinkage["S01"] - 3.0).abs() < 1e-9);
        let anomalies: Vec<_> = scored
            .iter()
            .map(|s| s.indicators.get(Indicator::StoreAnomaly))
            .collect();
        assert_eq!(anomalies, vec![false, false, true, false]);
    }

    #[test]
    fn zero_sales_and_rtv_flags() {
        let mut r = record("S01", (2024, 1, 2));
        r.sales = 0.0;
        r.rtv = 40.0;
        r.ending_inventory = 1060.0;
        let (_, scored) = score_records(&[r]);
        let v = scored[0].indicators;
        assert!(v.get(Indicator::ZeroSales));
        assert!(v.get(Indicator::HighRtv));
        assert!(!v.get(Indicator::LargeDiscrepancy));
    }

    #[test]
    fn counts_follow_declaration_order() {
        let (_, scored) = score_records(&[record("S01", (2024, 1, 6))]);
        let counts = indicator_counts(&scored);
        assert_eq!(counts.len(), 12);
        assert_eq!(counts[0].0, Indicator::HighShrinkage);
        assert_eq!(counts[10], (Indicator::Weekend, 1));
    }
}
