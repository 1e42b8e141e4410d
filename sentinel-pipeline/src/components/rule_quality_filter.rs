use sentinel_mining::AssociationRule;

use crate::filter::{Filter, FilterResult};
use crate::thresholds::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LIFT_THRESHOLD};

/// Keeps rules whose confidence and lift both meet their floors.
///
/// Both comparisons are inclusive. Kept rules preserve input order.
pub struct RuleQualityFilter {
    pub min_confidence: f64,
    pub min_lift: f64,
}

impl RuleQualityFilter {
    pub fn new(min_confidence: f64, min_lift: f64) -> Self {
        Self {
            min_confidence,
            min_lift,
        }
    }
}

impl Default for RuleQualityFilter {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_CONFIDENCE_THRESHOLD,
            min_lift: DEFAULT_LIFT_THRESHOLD,
        }
    }
}

impl Filter<AssociationRule> for RuleQualityFilter {
    fn filter(&self, candidates: Vec<AssociationRule>) -> FilterResult<AssociationRule> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|r| r.confidence >= self.min_confidence && r.lift >= self.min_lift);

        FilterResult { kept, removed }
    }
}
