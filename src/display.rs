//! Terminal rendering of search results.

use prettytable::{Cell, Row as PrettyRow, Table};

use crate::matching::types::MergedRecord;
use crate::search::SearchReport;

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let prefix: String = text.chars().take(limit).collect();
        format!("{}...", prefix)
    } else {
        text.to_string()
    }
}

/// Build the results table for a list of records
pub fn results_table(records: &[MergedRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Name"),
        Cell::new("Address"),
        Cell::new("Phone"),
        Cell::new("Rating"),
        Cell::new("Price"),
        Cell::new("Sources"),
        Cell::new("Confidence"),
    ]));

    for record in records {
        let rating = match record.rating {
            Some(rating) if record.review_count > 0 => {
                format!("{:.1} ({})", rating, record.review_count)
            }
            Some(rating) => format!("{:.1}", rating),
            None => "N/A".to_string(),
        };

        let sources = record
            .sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let confidence = if record.match_confidence > 0.0 {
            format!("{:.2}", record.match_confidence)
        } else {
            "-".to_string()
        };

        table.add_row(PrettyRow::new(vec![
            Cell::new(&truncate(&record.name, 30)),
            Cell::new(&truncate(&record.address, 40)),
            Cell::new(record.phone.as_deref().unwrap_or("N/A")),
            Cell::new(&rating),
            Cell::new(record.price.symbol()),
            Cell::new(&sources),
            Cell::new(&confidence),
        ]));
    }

    table
}

/// Print one search report with its summary line
pub fn print_report(report: &SearchReport) {
    println!(
        "\nFound {} gyms near {} ({} merged, avg confidence {})",
        report.records.len(),
        report.zipcode,
        report.merged_count,
        if report.average_confidence > 0.0 {
            format!("{:.0}%", report.average_confidence * 100.0)
        } else {
            "N/A".to_string()
        }
    );
    results_table(&report.records).printstd();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{BusinessRecord, MergedRecord, Source};

    #[test]
    fn test_results_table_has_row_per_record() {
        let records = vec![
            MergedRecord::from_single(BusinessRecord::new("A", "1 A St", Source::Yelp)),
            MergedRecord::from_single(BusinessRecord::new("B", "2 B St", Source::GooglePlaces)),
        ];
        let table = results_table(&records);
        // Header plus one row per record
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_truncate_long_values() {
        assert_eq!(truncate("short", 30), "short");
        let long = "x".repeat(40);
        let truncated = truncate(&long, 30);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 33);
    }
}
