//! Stocktake reconciliation fraud pattern pipeline.
//!
//! Records are scored against twelve binary risk indicators, grouped into
//! store-month transactions, mined for co-occurring indicators with both
//! Apriori and FP-Growth, and classified into suspicious patterns,
//! high-risk periods and store risk bands.

pub mod components;
pub mod config;
pub mod error;
pub mod filter;
pub mod indicators;
pub mod metrics;
pub mod pipelines;
pub mod recommendations;
pub mod record_loader;
pub mod report;
pub mod risk_classifier;
pub mod selector;
pub mod thresholds;
pub mod transaction_builder;
pub mod types;
pub mod util;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use indicators::{derive_indicators, score_records, DatasetThresholds, ScoredRecord};
pub use metrics::DerivedMetrics;
pub use pipelines::fraud_mining::FraudMiningPipeline;
pub use record_loader::{group_by_store, load_records, load_records_file, ReconciliationRecord};
pub use report::FraudReport;
pub use types::{Indicator, IndicatorVector, RiskBand, RiskCategory, YearMonth};
