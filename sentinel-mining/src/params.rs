//! Mining parameters and their eager validation.

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, MiningResult};

/// Default minimum support for frequent itemsets.
pub const DEFAULT_MIN_SUPPORT: f64 = 0.1;

/// Default minimum confidence applied when rules are generated.
/// Classification later applies a stricter cutoff.
pub const DEFAULT_RULE_MIN_CONFIDENCE: f64 = 0.5;

/// Parameters shared by every [`ItemsetMiner`](crate::miner::ItemsetMiner).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningParams {
    /// Minimum fraction of transactions an itemset must appear in (inclusive).
    pub min_support: f64,
    /// Largest itemset size to produce. `None` means unbounded, which is
    /// still capped by the 64-column limit of a transaction set.
    pub max_len: Option<usize>,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: None,
        }
    }
}

impl MiningParams {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Reject misconfigured thresholds before any mining work begins.
    pub fn validate(&self) -> MiningResult<()> {
        if !self.min_support.is_finite() || self.min_support <= 0.0 || self.min_support > 1.0 {
            return Err(MiningError::InvalidParameter {
                param: "min_support",
                reason: format!("must be in (0, 1], got {}", self.min_support),
            });
        }
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidParameter {
                param: "max_len",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Inclusive support test used by both algorithms so their results
    /// agree bit for bit.
    pub fn meets_support(&self, count: usize, total: usize) -> bool {
        total > 0 && support_of(count, total) >= self.min_support
    }

    /// Whether an itemset of `len` items may still be extended.
    pub fn can_grow(&self, len: usize) -> bool {
        self.max_len.map_or(true, |max| len < max)
    }
}

/// Support as a fraction of transactions; zero when there are none.
pub fn support_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(MiningParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_and_oversized_support() {
        for bad in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = MiningParams::new(bad).validate().unwrap_err();
            assert!(matches!(
                err,
                MiningError::InvalidParameter {
                    param: "min_support",
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_zero_max_len() {
        let err = MiningParams::new(0.2).with_max_len(0).validate().unwrap_err();
        assert!(matches!(err, MiningError::InvalidParameter { param: "max_len", .. }));
    }

    #[test]
    fn support_boundary_is_inclusive() {
        let params = MiningParams::new(0.1);
        assert!(params.meets_support(1, 10));
        assert!(!params.meets_support(0, 10));
        assert!(!params.meets_support(0, 0));
    }

    #[test]
    fn can_grow_respects_max_len() {
        let params = MiningParams::new(0.1).with_max_len(2);
        assert!(params.can_grow(1));
        assert!(!params.can_grow(2));
        assert!(MiningParams::new(0.1).can_grow(40));
    }
}
