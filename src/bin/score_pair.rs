//! Diagnostic tool: score two listing JSON files against each other and
//! print the per-signal breakdown the aggregate is built from.

use anyhow::{Context, Result};
use clap::Parser;
use prettytable::{Cell, Row as PrettyRow, Table};
use std::fs;

use gymintel::matching::{score_pair, BusinessRecord, MatchConfig, SignalBreakdown};

#[derive(Parser)]
#[command(author, version, about = "Score two business listings against each other", long_about = None)]
struct Cli {
    /// Path to the left (Yelp-side) listing JSON
    #[arg(short, long)]
    left: String,

    /// Path to the right (Google-side) listing JSON
    #[arg(short, long)]
    right: String,

    /// Allow the legacy partial phone-suffix match rule
    #[arg(long)]
    partial_phones: bool,
}

fn load_record(path: &str) -> Result<BusinessRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid listing JSON in {}", path))
}

fn breakdown_table(breakdown: &SignalBreakdown) -> Table {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Signal"),
        Cell::new("Contribution"),
    ]));

    let rows: &[(&str, f64)] = &[
        ("name", breakdown.name),
        ("name boost", breakdown.name_boost),
        ("address", breakdown.address),
        ("phone", breakdown.phone),
        ("chain", breakdown.chain),
        ("proximity", breakdown.proximity),
        ("domain", breakdown.domain),
        ("category", breakdown.category),
        ("price", breakdown.price),
        ("hours", breakdown.hours),
        ("review count", breakdown.review_count),
        ("website quality", breakdown.quality),
        ("enrichment", breakdown.enrichment),
    ];

    for (label, value) in rows {
        table.add_row(PrettyRow::new(vec![
            Cell::new(label),
            Cell::new(&format!("{:.3}", value)),
        ]));
    }

    table
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let left = load_record(&cli.left)?;
    let right = load_record(&cli.right)?;

    let config = MatchConfig::new().with_partial_phone_matching(cli.partial_phones);
    let scored = score_pair(&left, &right, None, &config);

    println!("'{}' vs '{}'", left.name, right.name);
    breakdown_table(&scored.breakdown).printstd();
    println!(
        "Confidence: {:.3} (threshold {:.2})",
        scored.confidence, config.threshold
    );

    Ok(())
}
