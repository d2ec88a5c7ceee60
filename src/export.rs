//! CSV and JSON export of merged search results.

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::matching::types::MergedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(anyhow::anyhow!("Unsupported export format: {}", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Write records as CSV rows to any writer
pub fn write_csv<W: Write>(records: &[MergedRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "name",
        "address",
        "phone",
        "rating",
        "review_count",
        "price",
        "url",
        "sources",
        "match_confidence",
    ])?;

    for record in records {
        let sources = record
            .sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let rating = record.rating.map(|r| r.to_string()).unwrap_or_default();
        let review_count = record.review_count.to_string();
        let confidence = format!("{:.2}", record.match_confidence);

        csv_writer.write_record([
            record.name.as_str(),
            record.address.as_str(),
            record.phone.as_deref().unwrap_or(""),
            rating.as_str(),
            review_count.as_str(),
            record.price.symbol(),
            record.url.as_deref().unwrap_or(""),
            sources.as_str(),
            confidence.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export records to `gyms_<label>_<timestamp>.<ext>` in the working
/// directory; returns the written path.
pub fn export_results(
    records: &[MergedRecord],
    label: &str,
    format: ExportFormat,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = PathBuf::from(format!("gyms_{}_{}.{}", label, timestamp, format));

    let file = File::create(&path)
        .with_context(|| format!("Failed to create export file {}", path.display()))?;

    match format {
        ExportFormat::Csv => write_csv(records, file)?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(file, records).context("Failed to serialize records")?
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{BusinessRecord, PriceTier, Source};

    fn sample_records() -> Vec<MergedRecord> {
        let mut merged = MergedRecord::from_single(
            BusinessRecord::new("Iron Temple", "100 W 20th St, New York, NY 10011", Source::Yelp)
                .with_phone("(212) 555-0001")
                .with_rating(4.5, 210)
                .with_price(PriceTier::Moderate)
                .with_url("https://www.yelp.com/biz/iron-temple"),
        );
        merged.match_confidence = 0.82;
        vec![merged]
    }

    #[test]
    fn test_write_csv_layout() {
        let mut buffer = Vec::new();
        write_csv(&sample_records(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,address,phone,rating,review_count,price,url,sources,match_confidence"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Iron Temple,"));
        assert!(row.contains("(212) 555-0001"));
        assert!(row.contains("0.82"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_json_round_trips_records() {
        let records = sample_records();
        let json = serde_json::to_string(&records).unwrap();
        let parsed: Vec<MergedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Iron Temple");
        assert_eq!(parsed[0].match_confidence, 0.82);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
