use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::thresholds::{
    CRITICAL_CATEGORY_SCORE, HIGH_CATEGORY_SCORE, HIGH_RISK_SCORE, STORE_BAND_EDGES,
};

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// A binary fraud risk indicator, in fixed declaration order.
///
/// The declaration order is the column order for mining and the order in
/// which fraud-type labels are joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    HighShrinkage,
    LargeDiscrepancy,
    HighRtv,
    ZeroSales,
    HighTransferOut,
    HighTransferIn,
    LowAccuracy,
    HighShipment,
    ZeroShipment,
    StoreAnomaly,
    Weekend,
    MonthEnd,
}

impl Indicator {
    pub const ALL: [Indicator; 12] = [
        Indicator::HighShrinkage,
        Indicator::LargeDiscrepancy,
        Indicator::HighRtv,
        Indicator::ZeroSales,
        Indicator::HighTransferOut,
        Indicator::HighTransferIn,
        Indicator::LowAccuracy,
        Indicator::HighShipment,
        Indicator::ZeroShipment,
        Indicator::StoreAnomaly,
        Indicator::Weekend,
        Indicator::MonthEnd,
    ];

    /// The seven indicators that make up the fraud score.
    ///
    /// Scoring deliberately covers only actionable severity signals. The
    /// other five (transfer-in, shipment volume, weekend, month-end) still
    /// feed pattern mining but never the score; keep the two lists apart.
    pub const SCORED: [Indicator; 7] = [
        Indicator::HighShrinkage,
        Indicator::LargeDiscrepancy,
        Indicator::HighRtv,
        Indicator::ZeroSales,
        Indicator::HighTransferOut,
        Indicator::LowAccuracy,
        Indicator::StoreAnomaly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Indicator::HighShrinkage => "high_shrinkage",
            Indicator::LargeDiscrepancy => "large_discrepancy",
            Indicator::HighRtv => "high_rtv",
            Indicator::ZeroSales => "zero_sales",
            Indicator::HighTransferOut => "high_transfer_out",
            Indicator::HighTransferIn => "high_transfer_in",
            Indicator::LowAccuracy => "low_accuracy",
            Indicator::HighShipment => "high_shipment",
            Indicator::ZeroShipment => "zero_shipment",
            Indicator::StoreAnomaly => "store_anomaly",
            Indicator::Weekend => "weekend",
            Indicator::MonthEnd => "month_end",
        }
    }

    /// Column index in an indicator vector or transaction.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_scored(self) -> bool {
        Self::SCORED.contains(&self)
    }

    /// Column names in declaration order, for building transaction sets.
    pub fn column_names() -> Vec<String> {
        Self::ALL.iter().map(|i| i.as_str().to_string()).collect()
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The twelve indicator values for one record or one transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IndicatorVector([bool; 12]);

impl IndicatorVector {
    pub fn get(&self, indicator: Indicator) -> bool {
        self.0[indicator.index()]
    }

    pub fn set(&mut self, indicator: Indicator, value: bool) {
        self.0[indicator.index()] = value;
    }

    pub fn with(mut self, indicator: Indicator, value: bool) -> Self {
        self.set(indicator, value);
        self
    }

    /// True indicators, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = Indicator> + '_ {
        Indicator::ALL.into_iter().filter(move |&i| self.get(i))
    }

    /// Count of true scored indicators, in [0, 7].
    pub fn fraud_score(&self) -> u8 {
        Indicator::SCORED.iter().filter(|&&i| self.get(i)).count() as u8
    }

    /// Element-wise OR.
    pub fn union(&self, other: &IndicatorVector) -> IndicatorVector {
        let mut merged = *self;
        for indicator in Indicator::ALL {
            if other.get(indicator) {
                merged.set(indicator, true);
            }
        }
        merged
    }

    /// Bitmask with bit `i` set for the indicator at column `i`.
    pub fn to_mask(&self) -> u64 {
        self.active().fold(0u64, |acc, i| acc | (1u64 << i.index()))
    }
}

impl Serialize for IndicatorVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Indicator::ALL.len()))?;
        for indicator in Indicator::ALL {
            map.serialize_entry(indicator.as_str(), &self.get(indicator))?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Risk levels
// ---------------------------------------------------------------------------

/// Category assigned to a high-risk record by its fraud score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskCategory {
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// `None` for records below the high-risk score.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            s if s >= CRITICAL_CATEGORY_SCORE => Some(RiskCategory::Critical),
            s if s >= HIGH_CATEGORY_SCORE => Some(RiskCategory::High),
            s if s >= HIGH_RISK_SCORE => Some(RiskCategory::Medium),
            _ => None,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskCategory::Medium => write!(f, "Medium"),
            RiskCategory::High => write!(f, "High"),
            RiskCategory::Critical => write!(f, "Critical"),
        }
    }
}

/// Store-level band for the mean fraud score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskBand {
    const BANDS: [RiskBand; 4] = [
        RiskBand::Low,
        RiskBand::Medium,
        RiskBand::High,
        RiskBand::VeryHigh,
    ];

    /// Band a mean score on edges `[0, 1, 2, 3, 10]`: each band includes its
    /// lower edge, and the last band also includes 10. Outside [0, 10] (or
    /// NaN) there is no band.
    pub fn from_mean_score(mean: f64) -> Option<Self> {
        let last = STORE_BAND_EDGES.len() - 1;
        if mean.is_nan() || mean < STORE_BAND_EDGES[0] || mean > STORE_BAND_EDGES[last] {
            return None;
        }
        STORE_BAND_EDGES
            .windows(2)
            .zip(Self::BANDS)
            .find(|(edge, _)| mean < edge[1])
            .map(|(_, band)| band)
            .or(Some(RiskBand::VeryHigh))
    }

    pub fn is_elevated(self) -> bool {
        matches!(self, RiskBand::High | RiskBand::VeryHigh)
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "Low"),
            RiskBand::Medium => write!(f, "Medium"),
            RiskBand::High => write!(f, "High"),
            RiskBand::VeryHigh => write!(f, "Very High"),
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar keys
// ---------------------------------------------------------------------------

/// Calendar month, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
