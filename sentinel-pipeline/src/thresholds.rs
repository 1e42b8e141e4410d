//! Centralized fraud indicator and risk policy thresholds.
//!
//! These values are policy, not tuning knobs: recommendation parity and the
//! indicator definitions both depend on them exactly.

/// Shrinkage rate (%) above which a period is `high_shrinkage`.
pub const HIGH_SHRINKAGE_RATE: f64 = 2.0;

/// Absolute discrepancy (units) above which a period is `large_discrepancy`.
pub const LARGE_DISCREPANCY_UNITS: f64 = 100.0;

/// RTV rate (%) above which a period is `high_rtv`.
pub const HIGH_RTV_RATE: f64 = 3.0;

/// Inventory accuracy (%) below which a period is `low_accuracy`.
pub const LOW_ACCURACY_PCT: f64 = 95.0;

/// Dataset-wide quantile used for transfer and shipment cutoffs.
pub const HIGH_VOLUME_QUANTILE: f64 = 0.9;

/// A period is a `store_anomaly` when its shrinkage exceeds this multiple
/// of the store's own mean shrinkage.
pub const STORE_ANOMALY_MULTIPLIER: f64 = 2.0;

/// First day of month counted as `month_end`.
pub const MONTH_END_FIRST_DAY: u32 = 25;

/// Fraud score at or above which a record is high risk.
pub const HIGH_RISK_SCORE: u8 = 3;

/// Fraud score at or above which a high-risk record is `High`.
pub const HIGH_CATEGORY_SCORE: u8 = 4;

/// Fraud score at or above which a high-risk record is `Critical`.
pub const CRITICAL_CATEGORY_SCORE: u8 = 5;

/// Store band edges for mean fraud score: [0,1) Low, [1,2) Medium,
/// [2,3) High, [3,10] Very High.
pub const STORE_BAND_EDGES: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 10.0];

/// Default rule classification cutoffs.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_LIFT_THRESHOLD: f64 = 1.5;
pub const DEFAULT_TOP_PATTERNS: usize = 10;

/// Recommendation triggers, as a fraction of all records.
pub const SHRINKAGE_RECOMMENDATION_SHARE: f64 = 0.10;
pub const DISCREPANCY_RECOMMENDATION_SHARE: f64 = 0.05;
pub const RTV_RECOMMENDATION_SHARE: f64 = 0.05;
