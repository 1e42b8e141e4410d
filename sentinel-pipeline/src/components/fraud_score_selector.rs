use crate::indicators::ScoredRecord;
use crate::selector::Selector;
use crate::thresholds::HIGH_RISK_SCORE;

/// Ranks high-risk records by descending fraud score, keeping dataset order
/// among equal scores.
///
/// Expects candidates already limited to scores of at least
/// `HIGH_RISK_SCORE`; see [`FraudScoreSelector::high_risk`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FraudScoreSelector;

impl FraudScoreSelector {
    /// Keep records at or above the high-risk score, then rank them.
    pub fn high_risk<'a>(&self, scored: &'a [ScoredRecord]) -> Vec<&'a ScoredRecord> {
        let candidates: Vec<&ScoredRecord> = scored
            .iter()
            .filter(|s| s.fraud_score >= HIGH_RISK_SCORE)
            .collect();
        self.select(candidates)
    }
}

impl<'a> Selector<&'a ScoredRecord> for FraudScoreSelector {
    fn score(&self, candidate: &&'a ScoredRecord) -> f64 {
        f64::from(candidate.fraud_score)
    }
}
