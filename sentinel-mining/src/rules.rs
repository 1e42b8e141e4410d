//! Association rules derived from frequent itemsets.
//!
//! For every frequent itemset of two or more items, each split into a
//! non-empty antecedent and its non-empty complement is a candidate rule:
//!
//! - support    = s(A ∪ C)
//! - confidence = s(A ∪ C) / s(A)
//! - lift       = confidence / s(C)
//! - leverage   = s(A ∪ C) - s(A)·s(C)
//! - conviction = (1 - s(C)) / (1 - confidence)
//!
//! Lift below 1 is kept here; deciding what counts as suspicious is left to
//! the caller.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, MiningResult};
use crate::itemset::FrequentItemsets;
use crate::params::DEFAULT_RULE_MIN_CONFIDENCE;

/// Which metric the generation threshold applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMetric {
    Support,
    Confidence,
    Lift,
}

impl fmt::Display for RuleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMetric::Support => write!(f, "support"),
            RuleMetric::Confidence => write!(f, "confidence"),
            RuleMetric::Lift => write!(f, "lift"),
        }
    }
}

/// Threshold applied while generating rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleThreshold {
    pub metric: RuleMetric,
    pub min_value: f64,
}

impl Default for RuleThreshold {
    fn default() -> Self {
        Self {
            metric: RuleMetric::Confidence,
            min_value: DEFAULT_RULE_MIN_CONFIDENCE,
        }
    }
}

impl RuleThreshold {
    pub fn confidence(min_value: f64) -> Self {
        Self {
            metric: RuleMetric::Confidence,
            min_value,
        }
    }

    pub fn validate(&self) -> MiningResult<()> {
        let upper = match self.metric {
            RuleMetric::Support | RuleMetric::Confidence => 1.0,
            RuleMetric::Lift => f64::INFINITY,
        };
        if self.min_value.is_nan() || self.min_value < 0.0 || self.min_value > upper {
            return Err(MiningError::InvalidParameter {
                param: "rule_min_threshold",
                reason: format!(
                    "{} threshold must be in [0, {}], got {}",
                    self.metric, upper, self.min_value
                ),
            });
        }
        Ok(())
    }
}

/// One antecedent → consequent rule with its quality metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    #[serde(skip)]
    pub antecedent_mask: u64,
    #[serde(skip)]
    pub consequent_mask: u64,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

impl AssociationRule {
    pub fn metric(&self, metric: RuleMetric) -> f64 {
        match metric {
            RuleMetric::Support => self.support,
            RuleMetric::Confidence => self.confidence,
            RuleMetric::Lift => self.lift,
        }
    }

    /// `antecedent → consequent` using the item names.
    pub fn label(&self) -> String {
        format!(
            "{} \u{2192} {}",
            self.antecedent.join(" + "),
            self.consequent.join(" + ")
        )
    }
}

/// Generate every rule from `frequent` whose chosen metric meets the threshold.
///
/// Rules come out in canonical itemset order, then by antecedent mask.
/// Empty input produces no rules.
pub fn generate_rules(
    frequent: &FrequentItemsets,
    threshold: &RuleThreshold,
) -> MiningResult<Vec<AssociationRule>> {
    threshold.validate()?;
    let supports = frequent.support_index();
    let mut rules = Vec::new();

    for itemset in frequent.itemsets().iter().filter(|s| s.len() >= 2) {
        let full = itemset.mask;
        // Enumerate proper non-empty subsets of `full` in ascending order.
        let mut antecedent = (full.wrapping_sub(1)) & full;
        let mut splits = Vec::new();
        while antecedent != 0 {
            splits.push(antecedent);
            antecedent = (antecedent - 1) & full;
        }
        splits.reverse();

        for antecedent in splits {
            let consequent = full & !antecedent;
            let rule = build_rule(frequent, &supports, itemset.support, antecedent, consequent)?;
            if rule.metric(threshold.metric) >= threshold.min_value {
                rules.push(rule);
            }
        }
    }

    log::debug!(
        "rules itemsets={} rules={} metric={} min={}",
        frequent.len(),
        rules.len(),
        threshold.metric,
        threshold.min_value
    );
    Ok(rules)
}

fn build_rule(
    frequent: &FrequentItemsets,
    supports: &HashMap<u64, f64>,
    support: f64,
    antecedent: u64,
    consequent: u64,
) -> MiningResult<AssociationRule> {
    let lookup = |mask: u64| {
        supports
            .get(&mask)
            .copied()
            .ok_or_else(|| MiningError::MissingSupport(frequent.names(mask)))
    };
    let antecedent_support = lookup(antecedent)?;
    let consequent_support = lookup(consequent)?;

    let confidence = support / antecedent_support;
    let lift = confidence / consequent_support;
    let leverage = support - antecedent_support * consequent_support;
    let conviction = if confidence >= 1.0 {
        f64::INFINITY
    } else {
        (1.0 - consequent_support) / (1.0 - confidence)
    };

    Ok(AssociationRule {
        antecedent: frequent.names(antecedent),
        consequent: frequent.names(consequent),
        antecedent_mask: antecedent,
        consequent_mask: consequent,
        antecedent_support,
        consequent_support,
        support,
        confidence,
        lift,
        leverage,
        conviction,
    })
}

/// Keep rules meeting both a confidence and a lift floor, preserving order.
pub fn filter_rules(
    rules: &[AssociationRule],
    min_confidence: f64,
    min_lift: f64,
) -> Vec<AssociationRule> {
    rules
        .iter()
        .filter(|r| r.confidence >= min_confidence && r.lift >= min_lift)
        .cloned()
        .collect()
}
