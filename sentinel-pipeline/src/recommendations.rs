//! Fixed-threshold prevention recommendations.

use std::fmt;

use serde::Serialize;

use crate::indicators::ScoredRecord;
use crate::risk_classifier::StoreRisk;
use crate::thresholds::{
    DISCREPANCY_RECOMMENDATION_SHARE, RTV_RECOMMENDATION_SHARE, SHRINKAGE_RECOMMENDATION_SHARE,
};
use crate::types::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: &'static str,
    pub priority: Priority,
    pub text: String,
}

/// Build recommendations from indicator shares and the store table.
///
/// Each share trigger is strict: the indicator count must exceed the given
/// fraction of all records.
pub fn recommend(scored: &[ScoredRecord], stores: &[StoreRisk]) -> Vec<Recommendation> {
    let total = scored.len() as f64;
    let count = |indicator: Indicator| {
        scored
            .iter()
            .filter(|s| s.indicators.get(indicator))
            .count()
    };
    let mut out = Vec::new();

    let high_shrinkage = count(Indicator::HighShrinkage);
    if high_shrinkage as f64 > total * SHRINKAGE_RECOMMENDATION_SHARE {
        out.push(Recommendation {
            category: "Shrinkage Control",
            priority: Priority::High,
            text: format!(
                "High shrinkage detected in {} periods. Implement enhanced inventory controls and staff training.",
                high_shrinkage
            ),
        });
    }

    let large_discrepancy = count(Indicator::LargeDiscrepancy);
    if large_discrepancy as f64 > total * DISCREPANCY_RECOMMENDATION_SHARE {
        out.push(Recommendation {
            category: "Inventory Accuracy",
            priority: Priority::High,
            text: format!(
                "Large discrepancies found in {} periods. Review counting procedures and implement cycle counting.",
                large_discrepancy
            ),
        });
    }

    let high_rtv = count(Indicator::HighRtv);
    if high_rtv as f64 > total * RTV_RECOMMENDATION_SHARE {
        out.push(Recommendation {
            category: "Vendor Management",
            priority: Priority::Medium,
            text: format!(
                "High RTV rates in {} periods. Review vendor quality and return policies.",
                high_rtv
            ),
        });
    }

    let flagged: Vec<&str> = stores
        .iter()
        .filter(|s| s.band.is_some_and(|b| b.is_elevated()))
        .map(|s| s.store.as_str())
        .collect();
    if !flagged.is_empty() {
        out.push(Recommendation {
            category: "Store Monitoring",
            priority: Priority::High,
            text: format!(
                "Focus on {} high-risk stores: {}",
                flagged.len(),
                flagged.join(", ")
            ),
        });
    }

    out
}
