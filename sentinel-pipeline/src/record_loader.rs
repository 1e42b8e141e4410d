//! CSV reconciliation record loader.
//!
//! Parses cleaned stocktake CSV files into `ReconciliationRecord` structs.
//! Expected CSV columns:
//!   store, period_start, period_end, beginning_inventory, shipment,
//!   transfer_in, transfer_out, rtv, sales, ending_inventory
//!
//! The title-case headers of the upstream cleaning step (`Store`,
//! `Period Start`, `Beginning Inventory`, ...) are accepted too. Cleaned
//! exports may also carry `Inventory_Discrepancy` and `Shrinkage_Rate`;
//! when present they are used as given instead of being recomputed.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// One store's stock reconciliation for one counting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    #[serde(alias = "Store")]
    pub store: String,
    #[serde(alias = "Period Start", deserialize_with = "deserialize_date")]
    pub period_start: NaiveDate,
    #[serde(alias = "Period End", deserialize_with = "deserialize_date")]
    pub period_end: NaiveDate,
    #[serde(alias = "Beginning Inventory")]
    pub beginning_inventory: f64,
    #[serde(alias = "Shipment")]
    pub shipment: f64,
    #[serde(alias = "Transfer In")]
    pub transfer_in: f64,
    #[serde(alias = "Transfer Out")]
    pub transfer_out: f64,
    #[serde(alias = "RTV")]
    pub rtv: f64,
    #[serde(alias = "Sales")]
    pub sales: f64,
    #[serde(alias = "Ending Inventory")]
    pub ending_inventory: f64,
    #[serde(alias = "Inventory_Discrepancy", default, deserialize_with = "deserialize_optional_number")]
    pub inventory_discrepancy: Option<f64>,
    #[serde(alias = "Shrinkage_Rate", default, deserialize_with = "deserialize_optional_number")]
    pub shrinkage_rate: Option<f64>,
}

impl ReconciliationRecord {
    /// Reject records the indicator math cannot make sense of.
    ///
    /// `index` is the record's position in its dataset and is carried into
    /// the error.
    pub fn validate(&self, index: usize) -> PipelineResult<()> {
        if self.store.trim().is_empty() {
            return Err(invalid(index, "store identifier is empty".to_string()));
        }
        if self.period_end < self.period_start {
            return Err(invalid(
                index,
                format!(
                    "period end {} is before period start {}",
                    self.period_end, self.period_start
                ),
            ));
        }
        for (field, value) in self.quantities() {
            if !value.is_finite() {
                return Err(invalid(index, format!("{} is not finite ({})", field, value)));
            }
        }
        for (field, value) in [
            ("inventory_discrepancy", self.inventory_discrepancy),
            ("shrinkage_rate", self.shrinkage_rate),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(invalid(index, format!("{} is not finite ({})", field, value)));
            }
        }
        Ok(())
    }

    fn quantities(&self) -> [(&'static str, f64); 7] {
        [
            ("beginning_inventory", self.beginning_inventory),
            ("shipment", self.shipment),
            ("transfer_in", self.transfer_in),
            ("transfer_out", self.transfer_out),
            ("rtv", self.rtv),
            ("sales", self.sales),
            ("ending_inventory", self.ending_inventory),
        ]
    }
}

fn invalid(record: usize, reason: String) -> PipelineError {
    PipelineError::InvalidRecord { record, reason }
}

/// Validate every record, stopping at the first bad one.
pub fn validate_records(records: &[ReconciliationRecord]) -> PipelineResult<()> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(index, record)| record.validate(index))
}

/// Load reconciliation records from a CSV reader.
///
/// Rows that fail to deserialize become `InvalidRecord` errors naming the
/// CSV line. Reader-level failures (I/O, non-UTF-8 headers) surface as
/// `PipelineError::Csv`. Loaded rows are validated before they are returned.
pub fn load_records<R: Read>(reader: R) -> PipelineResult<Vec<ReconciliationRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize().enumerate() {
        let record: ReconciliationRecord = result.map_err(|e: csv::Error| {
            if !is_row_error(&e) {
                return PipelineError::from(e);
            }
            let line = e
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);
            invalid(index, format!("CSV parse error at line {}: {}", line, e))
        })?;
        record.validate(index)?;
        records.push(record);
    }

    log::info!("loaded reconciliation records: count={}", records.len());
    Ok(records)
}

/// Errors caused by one row's content rather than by the reader.
fn is_row_error(e: &csv::Error) -> bool {
    matches!(
        e.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

/// Load reconciliation records from a CSV file path.
pub fn load_records_file<P: AsRef<Path>>(path: P) -> PipelineResult<Vec<ReconciliationRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_records(file)
}

/// Group records by store, sorted by store id.
pub fn group_by_store(
    records: &[ReconciliationRecord],
) -> Vec<(String, Vec<&ReconciliationRecord>)> {
    let mut groups: BTreeMap<&str, Vec<&ReconciliationRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.store.as_str()).or_default().push(record);
    }
    groups
        .into_iter()
        .map(|(store, group)| (store.to_string(), group))
        .collect()
}

/// Flexible date deserializer: ISO `YYYY-MM-DD`, or `DD/MM/YYYY` as
/// exported by the stocktake system.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| {
            serde::de::Error::custom(format!(
                "expected date as YYYY-MM-DD or DD/MM/YYYY, got '{}'",
                s
            ))
        })
}

/// Empty cells in optional numeric columns read as absent.
fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{}'", s))),
    }
}
