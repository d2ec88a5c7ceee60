use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use gymintel::batch::run_metro_search;
use gymintel::display::{print_report, results_table};
use gymintel::export::{export_results, ExportFormat};
use gymintel::logging::configure_logging;
use gymintel::matching::{MatchConfig, DEFAULT_CONFIDENCE_THRESHOLD};
use gymintel::metro::METRO_AREAS;
use gymintel::search::{GymSearch, SearchOptions};

#[derive(Parser)]
#[command(author, version, about = "Find and compare gyms across Yelp and Google Places", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for gyms around a single ZIP code
    Search {
        /// ZIP code to search around
        #[arg(short, long)]
        zipcode: String,

        /// Search radius in miles
        #[arg(short, long, default_value_t = 10.0)]
        radius: f64,

        /// Export format (csv or json)
        #[arg(short, long)]
        export: Option<ExportFormat>,

        /// Skip the Google Places search
        #[arg(long)]
        no_google: bool,

        /// Fetch Google place details for bonus confidence signals
        #[arg(long)]
        enrich: bool,

        /// Minimum confidence for merging two listings
        #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
        threshold: f64,

        /// Allow the legacy partial phone-suffix match rule
        #[arg(long)]
        partial_phones: bool,
    },

    /// Search every ZIP code in a metropolitan area
    Metro {
        /// Metro area code (see `areas`)
        #[arg(short, long)]
        code: String,

        /// Search radius in miles
        #[arg(short, long, default_value_t = 10.0)]
        radius: f64,

        /// Maximum searches in flight
        #[arg(long, default_value_t = 4)]
        max_workers: usize,

        /// Limit to the first N ZIP codes
        #[arg(long)]
        sample: Option<usize>,

        /// Export format (csv or json)
        #[arg(short, long)]
        export: Option<ExportFormat>,

        /// Minimum confidence for merging two listings
        #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
        threshold: f64,
    },

    /// List the known metropolitan areas
    Areas,
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            zipcode,
            radius,
            export,
            no_google,
            enrich,
            threshold,
            partial_phones,
        } => {
            let config = MatchConfig::new()
                .with_threshold(threshold)
                .with_partial_phone_matching(partial_phones);
            let search = GymSearch::from_env(config)?;

            let options = SearchOptions {
                radius_miles: radius,
                use_google: !no_google,
                use_enrichment: enrich,
            };

            let report = search.run(&zipcode, &options).await?;
            print_report(&report);

            if let Some(format) = export {
                let path = export_results(&report.records, &report.zipcode, format)?;
                info!("Results exported to {}", path.display());
            }
        }

        Commands::Metro {
            code,
            radius,
            max_workers,
            sample,
            export,
            threshold,
        } => {
            let config = MatchConfig::new().with_threshold(threshold);
            let search = Arc::new(GymSearch::from_env(config)?);

            let options = SearchOptions {
                radius_miles: radius,
                ..SearchOptions::default()
            };

            let report = run_metro_search(search, &code, options, max_workers, sample).await?;

            println!(
                "\n{} metro: {} gyms across {} ZIP codes ({} merged, {:.1}% duplicates removed)",
                report.stats.metro_name,
                report.stats.deduplicated_gym_count,
                report.stats.zip_codes_successful,
                report.stats.total_merged_gyms,
                report.stats.duplication_rate
            );
            results_table(&report.gyms).printstd();

            for (zipcode, error) in &report.failures {
                println!("  failed {}: {}", zipcode, error);
            }

            if let Some(format) = export {
                let path = export_results(&report.gyms, &code, format)?;
                info!("Results exported to {}", path.display());
            }
        }

        Commands::Areas => {
            for metro in METRO_AREAS {
                println!(
                    "{:10} {} ({}) - {} ZIP codes, {} density",
                    metro.code,
                    metro.name,
                    metro.state,
                    metro.zip_codes.len(),
                    metro.density_category
                );
            }
        }
    }

    Ok(())
}
