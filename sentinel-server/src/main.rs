use std::path::PathBuf;
use std::process;
use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use sentinel_pipeline::report::FraudReport;
use sentinel_pipeline::{load_records_file, FraudMiningPipeline, PipelineConfig, PipelineResult};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Mine fraud patterns from cleaned stocktake reconciliation records.
#[derive(Debug, Parser)]
#[command(name = "sentinel-server", version)]
struct Cli {
    /// Cleaned reconciliation records (CSV with header row).
    records: PathBuf,

    /// JSON file with pipeline parameters. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum itemset support, in (0, 1].
    #[arg(long)]
    min_support: Option<f64>,

    /// Confidence threshold for suspicious rules.
    #[arg(long)]
    confidence: Option<f64>,

    /// Lift threshold for suspicious rules.
    #[arg(long)]
    lift: Option<f64>,

    /// Number of top suspicious rules to report.
    #[arg(long)]
    top: Option<usize>,

    /// Largest itemset size either miner produces.
    #[arg(long)]
    max_len: Option<usize>,

    /// Comma-separated store ids to analyze.
    #[arg(long, value_delimiter = ',')]
    stores: Option<Vec<String>>,

    /// Output as JSON instead of formatted text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineResult<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(v) = self.min_support {
            config.min_support = v;
        }
        if let Some(v) = self.confidence {
            config.confidence_threshold = v;
        }
        if let Some(v) = self.lift {
            config.lift_threshold = v;
        }
        if let Some(v) = self.top {
            config.top_n = v;
        }
        if self.max_len.is_some() {
            config.max_itemset_len = self.max_len;
        }
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson<'a> {
    generated_at: String,
    config: &'a PipelineConfig,
    load_ms: u128,
    pipeline_ms: u128,
    #[serde(flatten)]
    report: &'a FraudReport,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_section(title: &str) {
    println!();
    println!("  {}", title);
    println!("  {:\u{2500}<64}", "");
}

fn print_human(report: &FraudReport, load_ms: u128, pipeline_ms: u128) {
    let rule = "\u{2550}".repeat(62);
    println!();
    println!("  \u{2554}{}\u{2557}", rule);
    println!("  \u{2551}        PROFIT SENTINEL \u{00b7} Stocktake Fraud Pattern Digest        \u{2551}");
    println!("  \u{255a}{}\u{255d}", rule);
    println!();

    let s = &report.summary;
    println!(
        "  {} records  \u{00b7}  {} store-month transactions  \u{00b7}  {} high-risk ({:.1}%)",
        s.total_records, s.transaction_count, s.high_risk_records, s.high_risk_rate
    );
    println!(
        "  mean fraud score {:.2}  \u{00b7}  {} stores with high-risk periods",
        s.mean_fraud_score, s.stores_with_high_risk
    );

    print_section("Indicators");
    for c in &report.indicator_counts {
        println!("    {:20} {:>6}", c.indicator.as_str(), c.count);
    }

    print_section("Miners");
    for a in &report.algorithms {
        println!(
            "    {:10} {:>5} itemsets  {:>5} rules  {:>4} suspicious",
            a.algorithm,
            a.frequent_itemsets.len(),
            a.rules.len(),
            a.suspicious_rules.len()
        );
    }
    let cmp = &report.miner_comparison;
    if cmp.identical {
        println!("    {} and {} agree", cmp.left, cmp.right);
    } else {
        println!(
            "    DISAGREEMENT: {} only in {}, {} only in {}",
            cmp.only_left.len(),
            cmp.left,
            cmp.only_right.len(),
            cmp.right
        );
    }

    print_section("Top suspicious patterns");
    match report.algorithms.first() {
        Some(a) if !a.top_suspicious.is_empty() => {
            for (i, r) in a.top_suspicious.iter().enumerate() {
                println!(
                    "  {:>3}. {}  support {:.2}  confidence {:.2}  lift {:.2}",
                    i + 1,
                    r.label(),
                    r.support,
                    r.confidence,
                    r.lift
                );
            }
        }
        _ => println!("    No suspicious patterns found."),
    }

    print_section("Store risk");
    for store in &report.store_risk {
        let band = store
            .band
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "    {:12} mean {:.2}  {:>3} high-risk  {:>3} shrinkage  {}",
            store.store, store.mean_score, store.high_risk_count, store.high_shrinkage_count, band
        );
    }

    print_section("High-risk periods");
    if report.high_risk_periods.is_empty() {
        println!("    None. All clear!");
    }
    for p in &report.high_risk_periods {
        println!(
            "    {:12} {} .. {}  score {}  {:8}  {}",
            p.store, p.period_start, p.period_end, p.fraud_score, p.category.to_string(), p.fraud_types
        );
    }

    print_section("Recommendations");
    if report.recommendations.is_empty() {
        println!("    None.");
    }
    for r in &report.recommendations {
        println!("    [{}] {}: {}", r.priority, r.category, r.text);
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match cli.pipeline_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error in configuration: {}", e);
            process::exit(1);
        }
    };

    let load_start = Instant::now();
    let mut records = match load_records_file(&cli.records) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    if let Some(stores) = &cli.stores {
        records.retain(|r| stores.contains(&r.store));
        if records.is_empty() {
            eprintln!("Error: no matching stores found in the data");
            eprintln!("  Requested: {:?}", stores);
            process::exit(1);
        }
    }

    let pipeline_start = Instant::now();
    let report = match FraudMiningPipeline::new(config.clone()).run(&records) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running pipeline: {}", e);
            process::exit(1);
        }
    };
    let pipeline_ms = pipeline_start.elapsed().as_millis();
    log::info!("pipeline finished: load_ms={} pipeline_ms={}", load_ms, pipeline_ms);

    if cli.json {
        let out = ReportJson {
            generated_at: Utc::now().to_rfc3339(),
            config: &config,
            load_ms,
            pipeline_ms,
            report: &report,
        };
        match serde_json::to_string_pretty(&out) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(&report, load_ms, pipeline_ms);
    }
}
