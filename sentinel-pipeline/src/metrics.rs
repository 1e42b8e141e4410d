//! Per-record derived metrics.
//!
//! Pure functions of one `ReconciliationRecord`. Zero denominators are
//! replaced by 1 so every rate is finite. A discrepancy or shrinkage rate
//! already present on the record is taken as given.

use serde::Serialize;

use crate::record_loader::ReconciliationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// BI + shipment + TI - TO - RTV - sales.
    pub expected_ending: f64,
    /// Counted ending minus expected ending. Negative means missing stock.
    pub discrepancy: f64,
    /// Missing stock over inflow, in percent. Positive when counted stock
    /// falls short of expected.
    pub shrinkage_rate: f64,
    /// RTV over inflow, in percent.
    pub rtv_rate: f64,
    /// `(1 - |discrepancy| / inflow) * 100`.
    pub accuracy: f64,
    pub turnover: f64,
    /// Inclusive length of the counting period.
    pub period_days: i64,
}

impl DerivedMetrics {
    pub fn of(record: &ReconciliationRecord) -> Self {
        let inflow = record.beginning_inventory + record.shipment + record.transfer_in;
        let expected_ending =
            inflow - record.transfer_out - record.rtv - record.sales;
        let discrepancy = record
            .inventory_discrepancy
            .unwrap_or(record.ending_inventory - expected_ending);
        let inflow = nonzero(inflow);
        let average_stock = nonzero((record.beginning_inventory + record.ending_inventory) / 2.0);

        Self {
            expected_ending,
            discrepancy,
            shrinkage_rate: record
                .shrinkage_rate
                .unwrap_or(-discrepancy / inflow * 100.0),
            rtv_rate: record.rtv / inflow * 100.0,
            accuracy: (1.0 - discrepancy.abs() / inflow) * 100.0,
            turnover: record.sales / average_stock,
            period_days: (record.period_end - record.period_start).num_days() + 1,
        }
    }
}

fn nonzero(denominator: f64) -> f64 {
    if denominator == 0.0 {
        1.0
    } else {
        denominator
    }
}

/// Metrics for every record, index-aligned.
pub fn derive_metrics(records: &[ReconciliationRecord]) -> Vec<DerivedMetrics> {
    records.iter().map(DerivedMetrics::of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(bi: f64, ship: f64, ti: f64, to: f64, rtv: f64, sales: f64, ei: f64) -> ReconciliationRecord {
        ReconciliationRecord {
            store: "S01".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            beginning_inventory: bi,
            shipment: ship,
            transfer_in: ti,
            transfer_out: to,
            rtv,
            sales,
            ending_inventory: ei,
            inventory_discrepancy: None,
            shrinkage_rate: None,
        }
    }

    #[test]
    fn balanced_period_has_no_discrepancy() {
        let m = DerivedMetrics::of(&record(1000.0, 200.0, 0.0, 0.0, 0.0, 150.0, 1050.0));
        assert_eq!(m.expected_ending, 1050.0);
        assert_eq!(m.discrepancy, 0.0);
        assert_eq!(m.shrinkage_rate, 0.0);
        assert_eq!(m.accuracy, 100.0);
        assert_eq!(m.period_days, 14);
    }

    #[test]
    fn rates_are_relative_to_inflow() {
        // inflow 1000, expected 900, counted 850.
        let m = DerivedMetrics::of(&record(800.0, 150.0, 50.0, 0.0, 40.0, 60.0, 850.0));
        assert_eq!(m.discrepancy, -50.0);
        assert!((m.shrinkage_rate - 5.0).abs() < 1e-12);
        assert!((m.rtv_rate - 4.0).abs() < 1e-12);
        assert!((m.accuracy - 95.0).abs() < 1e-12);
        assert!((m.turnover - 60.0 / 825.0).abs() < 1e-12);
    }

    #[test]
    fn supplied_discrepancy_and_shrinkage_are_used_as_given() {
        // expected 900, counted 950, but the export already carries both values.
        let mut r = record(1000.0, 0.0, 0.0, 0.0, 0.0, 100.0, 950.0);
        r.inventory_discrepancy = Some(50.0);
        r.shrinkage_rate = Some(5.0);
        let m = DerivedMetrics::of(&r);
        assert_eq!(m.expected_ending, 900.0);
        assert_eq!(m.discrepancy, 50.0);
        assert_eq!(m.shrinkage_rate, 5.0);
        assert!((m.accuracy - 95.0).abs() < 1e-12);

        // Only the rate supplied: the discrepancy is recomputed.
        r.inventory_discrepancy = None;
        r.ending_inventory = 880.0;
        let m = DerivedMetrics::of(&r);
        assert_eq!(m.discrepancy, -20.0);
        assert_eq!(m.shrinkage_rate, 5.0);
    }

    #[test]
    fn zero_denominators_divide_by_one() {
        let m = DerivedMetrics::of(&record(0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        assert_eq!(m.discrepancy, 2.0);
        assert_eq!(m.shrinkage_rate, -200.0);
        assert_eq!(m.rtv_rate, 200.0);
        assert_eq!(m.turnover, 0.0);
        assert!(m.accuracy.is_finite());
    }
}
