//! Store × calendar-month transaction building.
//!
//! Each (store, year-month) bucket becomes one transaction whose indicator
//! columns are the OR of every record in the bucket. Columns follow
//! `Indicator::ALL`, so the mapping is identical for every miner run.

use std::collections::BTreeMap;

use sentinel_mining::TransactionSet;
use serde::Serialize;

use crate::error::PipelineResult;
use crate::indicators::ScoredRecord;
use crate::types::{Indicator, IndicatorVector, YearMonth};

/// One store-month bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreMonth {
    pub store: String,
    pub year_month: YearMonth,
    pub record_count: usize,
    pub indicators: IndicatorVector,
}

/// The buckets in (store, month) order plus the matching transaction set.
#[derive(Debug, Clone)]
pub struct StoreMonthTransactions {
    pub buckets: Vec<StoreMonth>,
    pub transactions: TransactionSet,
}

/// Build one transaction per (store, year-month).
pub fn build_transactions(scored: &[ScoredRecord]) -> PipelineResult<StoreMonthTransactions> {
    let mut groups: BTreeMap<(&str, YearMonth), (usize, IndicatorVector)> = BTreeMap::new();
    for record in scored {
        let entry = groups
            .entry((record.store.as_str(), record.year_month))
            .or_insert((0, IndicatorVector::default()));
        entry.0 += 1;
        entry.1 = entry.1.union(&record.indicators);
    }

    let buckets: Vec<StoreMonth> = groups
        .into_iter()
        .map(|((store, year_month), (record_count, indicators))| StoreMonth {
            store: store.to_string(),
            year_month,
            record_count,
            indicators,
        })
        .collect();

    let rows = buckets.iter().map(|b| b.indicators.to_mask()).collect();
    let transactions = TransactionSet::from_masks(Indicator::column_names(), rows)?;

    log::info!(
        "built transactions: records={} transactions={}",
        scored.len(),
        transactions.len()
    );
    Ok(StoreMonthTransactions {
        buckets,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DerivedMetrics;
    use chrono::NaiveDate;

    fn scored(store: &str, y: i32, m: u32, d: u32, on: &[Indicator]) -> ScoredRecord {
        let start = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let indicators = on
            .iter()
            .fold(IndicatorVector::default(), |v, &i| v.with(i, true));
        ScoredRecord {
            index: 0,
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

    #[test]
    fn buckets_or_their_records() {
        let records = vec![
            scored("S01", 2024, 1, 1, &[Indicator::HighShrinkage]),
            scored("S01", 2024, 1, 15, &[Indicator::ZeroSales]),
            scored("S01", 2024, 2, 1, &[]),
            scored("S02", 2024, 1, 3, &[Indicator::Weekend]),
        ];
        let built = build_transactions(&records).unwrap();
        assert_eq!(built.transactions.len(), 3);
        assert_eq!(built.transactions.item_count(), 12);

        let first = &built.buckets[0];
        assert_eq!(first.store, "S01");
        assert_eq!(first.year_month.to_string(), "2024-01");
        assert_eq!(first.record_count, 2);
        assert!(first.indicators.get(Indicator::HighShrinkage));
        assert!(first.indicators.get(Indicator::ZeroSales));
        assert_eq!(built.transactions.rows()[0], 0b1001);
        assert_eq!(built.transactions.rows()[1], 0);
    }

    #[test]
    fn single_record_bucket_is_unchanged() {
        let record = scored("S07", 2023, 12, 30, &[Indicator::LowAccuracy, Indicator::MonthEnd]);
        let built = build_transactions(std::slice::from_ref(&record)).unwrap();
        assert_eq!(built.buckets[0].indicators, record.indicators);
        assert_eq!(built.transactions.rows(), &[record.indicators.to_mask()]);
    }

    #[test]
    fn no_records_no_transactions() {
        let built = build_transactions(&[]).unwrap();
        assert!(built.transactions.is_empty());
        assert_eq!(built.transactions.items()[0], "high_shrinkage");
    }
}
