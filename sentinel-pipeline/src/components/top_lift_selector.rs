use sentinel_mining::AssociationRule;

use crate::selector::Selector;
use crate::thresholds::DEFAULT_TOP_PATTERNS;

/// Selects the top N rules by lift.
pub struct TopLiftSelector {
    pub n: usize,
}

impl Default for TopLiftSelector {
    fn default() -> Self {
        Self {
            n: DEFAULT_TOP_PATTERNS,
        }
    }
}

impl Selector<AssociationRule> for TopLiftSelector {
    fn score(&self, candidate: &AssociationRule) -> f64 {
        candidate.lift
    }

    fn size(&self) -> Option<usize> {
        Some(self.n)
    }
}
