//! Per-ZIP search pipeline: geocode, query both providers, reconcile, and
//! summarize.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::environment::get_optional_env;
use crate::geocode::Geocoder;
use crate::matching::{
    match_records_with_enrichment, merge_results, Coordinates, EnrichmentSignals, MatchConfig,
    MergedRecord,
};
use crate::providers::{GooglePlacesClient, YelpClient};
use crate::TARGET_WEB_REQUEST;

pub const YELP_API_KEY_VAR: &str = "YELP_API_KEY";
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";

/// Per-run options; the match configuration lives on [`GymSearch`]
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub radius_miles: f64,
    pub use_google: bool,
    pub use_enrichment: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            radius_miles: 10.0,
            use_google: true,
            use_enrichment: false,
        }
    }
}

/// Outcome of one per-ZIP search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub zipcode: String,
    pub coordinates: Coordinates,
    pub yelp_count: usize,
    pub google_count: usize,
    pub merged_count: usize,
    pub average_confidence: f64,
    pub records: Vec<MergedRecord>,
}

/// The assembled search pipeline: geocoder, provider clients, and the match
/// configuration, passed in explicitly rather than read from globals.
#[derive(Debug, Clone)]
pub struct GymSearch {
    geocoder: Geocoder,
    yelp: Option<YelpClient>,
    google: Option<GooglePlacesClient>,
    config: MatchConfig,
}

impl GymSearch {
    pub fn new(
        geocoder: Geocoder,
        yelp: Option<YelpClient>,
        google: Option<GooglePlacesClient>,
        config: MatchConfig,
    ) -> Self {
        GymSearch {
            geocoder,
            yelp,
            google,
            config,
        }
    }

    /// Build the pipeline from `YELP_API_KEY` / `GOOGLE_PLACES_API_KEY`.
    /// Missing keys disable that provider rather than failing.
    pub fn from_env(config: MatchConfig) -> Result<Self> {
        let yelp = match get_optional_env(YELP_API_KEY_VAR) {
            Some(key) => Some(YelpClient::new(&key)?),
            None => {
                warn!("{} not set; Yelp search disabled", YELP_API_KEY_VAR);
                None
            }
        };

        let google = match get_optional_env(GOOGLE_API_KEY_VAR) {
            Some(key) => Some(GooglePlacesClient::new(&key)?),
            None => {
                warn!("{} not set; Google Places search disabled", GOOGLE_API_KEY_VAR);
                None
            }
        };

        Ok(GymSearch::new(Geocoder::new()?, yelp, google, config))
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run the full pipeline for one ZIP code
    pub async fn run(&self, zipcode: &str, options: &SearchOptions) -> Result<SearchReport> {
        let coordinates = self
            .geocoder
            .resolve_zip(zipcode)
            .await?
            .ok_or_else(|| anyhow!("Could not find coordinates for ZIP code {}", zipcode))?;

        info!(
            "Searching for gyms near {} ({:.4}, {:.4})",
            zipcode, coordinates.lat, coordinates.lng
        );

        let yelp_records = match &self.yelp {
            Some(client) => match client
                .search(coordinates.lat, coordinates.lng, options.radius_miles)
                .await
            {
                Ok(records) => records,
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "Yelp search failed: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let google_client = self.google.as_ref().filter(|_| options.use_google);
        let google_records = match google_client {
            Some(client) => match client
                .search(coordinates.lat, coordinates.lng, options.radius_miles)
                .await
            {
                Ok(records) => records,
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "Google Places search failed: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        // Optional detail lookups; a failed lookup just loses its bonus
        let mut enrichment: HashMap<String, EnrichmentSignals> = HashMap::new();
        if options.use_enrichment {
            if let Some(client) = google_client {
                for record in &google_records {
                    let Some(place_id) = record.provider_id.as_deref() else {
                        continue;
                    };
                    match client.enrichment_signals(place_id).await {
                        Ok(signals) => {
                            enrichment.insert(place_id.to_string(), signals);
                        }
                        Err(err) => {
                            warn!(
                                target: TARGET_WEB_REQUEST,
                                "Enrichment lookup failed for {}: {}", place_id, err
                            );
                        }
                    }
                }
            }
        }

        let result =
            match_records_with_enrichment(&yelp_records, &google_records, &self.config, &enrichment);

        let mut records = merge_results(result);
        sort_records(&mut records);

        let (merged_count, average_confidence) = merge_statistics(&records);

        info!(
            "Found {} Yelp + {} Google = {} unique gyms near {} ({} merged, avg confidence {:.2})",
            yelp_records.len(),
            google_records.len(),
            records.len(),
            zipcode,
            merged_count,
            average_confidence
        );

        Ok(SearchReport {
            zipcode: zipcode.to_string(),
            coordinates,
            yelp_count: yelp_records.len(),
            google_count: google_records.len(),
            merged_count,
            average_confidence,
            records,
        })
    }
}

/// Sort by match confidence, then rating, descending
pub fn sort_records(records: &mut [MergedRecord]) {
    records.sort_by(|a, b| {
        b.match_confidence
            .partial_cmp(&a.match_confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Count of merged records and their average confidence
pub fn merge_statistics(records: &[MergedRecord]) -> (usize, f64) {
    let confidences: Vec<f64> = records
        .iter()
        .filter(|r| r.match_confidence > 0.0)
        .map(|r| r.match_confidence)
        .collect();

    if confidences.is_empty() {
        (0, 0.0)
    } else {
        let sum: f64 = confidences.iter().sum();
        (confidences.len(), sum / confidences.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{BusinessRecord, MergedRecord, Source};

    fn record(name: &str, confidence: f64, rating: Option<f64>) -> MergedRecord {
        let mut merged =
            MergedRecord::from_single(BusinessRecord::new(name, "1 A St", Source::Yelp));
        merged.match_confidence = confidence;
        merged.rating = rating;
        merged
    }

    #[test]
    fn test_sort_records_confidence_then_rating() {
        let mut records = vec![
            record("low", 0.0, Some(4.9)),
            record("high", 0.8, Some(4.0)),
            record("mid", 0.5, None),
            record("low-rated", 0.0, Some(3.0)),
        ];
        sort_records(&mut records);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low", "low-rated"]);
    }

    #[test]
    fn test_merge_statistics() {
        let records = vec![
            record("a", 0.8, None),
            record("b", 0.4, None),
            record("c", 0.0, None),
        ];
        let (count, average) = merge_statistics(&records);
        assert_eq!(count, 2);
        assert!((average - 0.6).abs() < 1e-9);

        assert_eq!(merge_statistics(&[]), (0, 0.0));
    }
}
