//! Pipeline configuration.

use std::path::Path;

use sentinel_mining::{MiningParams, DEFAULT_MIN_SUPPORT, DEFAULT_RULE_MIN_CONFIDENCE};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::thresholds::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LIFT_THRESHOLD, DEFAULT_TOP_PATTERNS};

/// Mining and classification parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum itemset support, in (0, 1].
    pub min_support: f64,
    /// Confidence floor applied when rules are generated.
    pub rule_min_confidence: f64,
    /// Confidence floor for suspicious rules.
    pub confidence_threshold: f64,
    /// Lift floor for suspicious rules.
    pub lift_threshold: f64,
    /// Number of top suspicious rules reported.
    pub top_n: usize,
    /// Largest itemset either miner produces. Unbounded when `None`.
    pub max_itemset_len: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            rule_min_confidence: DEFAULT_RULE_MIN_CONFIDENCE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            lift_threshold: DEFAULT_LIFT_THRESHOLD,
            top_n: DEFAULT_TOP_PATTERNS,
            max_itemset_len: None,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(invalid(
                "min_support",
                format!("must be in (0, 1], got {}", self.min_support),
            ));
        }
        for (param, value) in [
            ("rule_min_confidence", self.rule_min_confidence),
            ("confidence_threshold", self.confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(param, format!("must be in [0, 1], got {}", value)));
            }
        }
        if !self.lift_threshold.is_finite() || self.lift_threshold < 0.0 {
            return Err(invalid(
                "lift_threshold",
                format!("must be finite and non-negative, got {}", self.lift_threshold),
            ));
        }
        if self.max_itemset_len == Some(0) {
            return Err(invalid("max_itemset_len", "must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn mining_params(&self) -> MiningParams {
        let params = MiningParams::new(self.min_support);
        match self.max_itemset_len {
            Some(len) => params.with_max_len(len),
            None => params,
        }
    }
}

fn invalid(param: &'static str, reason: String) -> PipelineError {
    PipelineError::InvalidParameter { param, reason }
}
