pub mod fraud_score_selector;
pub mod rule_quality_filter;
pub mod top_lift_selector;
