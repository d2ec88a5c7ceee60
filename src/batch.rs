//! Bounded fan-out of the per-ZIP search across a metro area, plus
//! cross-ZIP deduplication and aggregate statistics.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

use crate::matching::normalizer::{clean_name, fold_name, normalize_address};
use crate::matching::types::{MergedRecord, SourceLabel};
use crate::metro::{metro_area, MetroArea};
use crate::search::{GymSearch, SearchOptions, SearchReport};

/// Run the per-ZIP search for each ZIP code with at most `max_workers`
/// searches in flight. Failures are recorded per ZIP, never fatal to the
/// batch.
pub async fn run_batch_search(
    search: Arc<GymSearch>,
    zip_codes: &[String],
    options: SearchOptions,
    max_workers: usize,
) -> BTreeMap<String, Result<SearchReport>> {
    let mut results = BTreeMap::new();
    let workers = max_workers.max(1);

    info!(
        "Starting batch search for {} ZIP codes ({} workers)",
        zip_codes.len(),
        workers
    );

    for chunk in zip_codes.chunks(workers) {
        let mut handles = Vec::with_capacity(chunk.len());

        for zipcode in chunk {
            let search = Arc::clone(&search);
            let zipcode = zipcode.clone();
            handles.push(tokio::spawn(async move {
                let outcome = search.run(&zipcode, &options).await;
                (zipcode, outcome)
            }));
        }

        for handle in handles {
            match handle.await {
                Ok((zipcode, outcome)) => {
                    if let Err(err) = &outcome {
                        warn!("Search failed for {}: {}", zipcode, err);
                    }
                    results.insert(zipcode, outcome);
                }
                Err(join_err) => {
                    warn!("Search worker panicked: {}", join_err);
                }
            }
        }
    }

    results
}

/// Remove cross-ZIP duplicates: records sharing a (cleaned name,
/// normalized address) signature collapse to the highest-confidence one.
/// First-seen order is preserved.
pub fn dedup_across_zips(gyms: Vec<MergedRecord>) -> Vec<MergedRecord> {
    let mut by_signature: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<MergedRecord> = Vec::new();

    for gym in gyms {
        let mut name_key = clean_name(&gym.name);
        if name_key.is_empty() {
            name_key = fold_name(&gym.name);
        }
        let signature = (name_key, normalize_address(&gym.address));

        match by_signature.get(&signature) {
            Some(&index) => {
                if gym.match_confidence > kept[index].match_confidence {
                    kept[index] = gym;
                }
            }
            None => {
                by_signature.insert(signature, kept.len());
                kept.push(gym);
            }
        }
    }

    kept
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceDistribution {
    pub yelp: usize,
    pub google_places: usize,
    pub merged: usize,
}

/// Aggregate statistics over one metro batch
#[derive(Debug, Clone, Serialize)]
pub struct MetroStats {
    pub metro_code: String,
    pub metro_name: String,
    pub zip_codes_processed: usize,
    pub zip_codes_successful: usize,
    pub zip_codes_failed: usize,
    pub total_gyms_found: usize,
    pub total_merged_gyms: usize,
    pub overall_merge_rate: f64,
    pub average_confidence: f64,
    pub source_distribution: SourceDistribution,
    pub gyms_per_zip_average: f64,
    pub gyms_per_zip_maximum: usize,
    pub gyms_per_zip_minimum: usize,
    pub deduplicated_gym_count: usize,
    pub duplication_rate: f64,
}

/// Compute batch statistics from per-ZIP outcomes and the deduplicated
/// total
pub fn compute_metro_stats(
    metro: &MetroArea,
    results: &BTreeMap<String, Result<SearchReport>>,
    deduplicated_gym_count: usize,
) -> MetroStats {
    let successful: Vec<&SearchReport> =
        results.values().filter_map(|r| r.as_ref().ok()).collect();
    let failed = results.len() - successful.len();

    let total_gyms: usize = successful.iter().map(|r| r.records.len()).sum();
    let total_merged: usize = successful.iter().map(|r| r.merged_count).sum();

    let confidences: Vec<f64> = successful
        .iter()
        .flat_map(|r| r.records.iter())
        .filter(|g| g.match_confidence > 0.0)
        .map(|g| g.match_confidence)
        .collect();
    let average_confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    let mut distribution = SourceDistribution::default();
    for gym in successful.iter().flat_map(|r| r.records.iter()) {
        match gym.source_label {
            SourceLabel::Merged => distribution.merged += 1,
            SourceLabel::Yelp => distribution.yelp += 1,
            SourceLabel::GooglePlaces => distribution.google_places += 1,
        }
    }

    let per_zip: Vec<usize> = successful.iter().map(|r| r.records.len()).collect();
    let gyms_per_zip_average = if per_zip.is_empty() {
        0.0
    } else {
        per_zip.iter().sum::<usize>() as f64 / per_zip.len() as f64
    };

    MetroStats {
        metro_code: metro.code.to_string(),
        metro_name: metro.name.to_string(),
        zip_codes_processed: results.len(),
        zip_codes_successful: successful.len(),
        zip_codes_failed: failed,
        total_gyms_found: total_gyms,
        total_merged_gyms: total_merged,
        overall_merge_rate: if total_gyms > 0 {
            total_merged as f64 / total_gyms as f64 * 100.0
        } else {
            0.0
        },
        average_confidence,
        source_distribution: distribution,
        gyms_per_zip_average,
        gyms_per_zip_maximum: per_zip.iter().copied().max().unwrap_or(0),
        gyms_per_zip_minimum: per_zip.iter().copied().min().unwrap_or(0),
        deduplicated_gym_count,
        duplication_rate: if total_gyms > 0 {
            (total_gyms - deduplicated_gym_count) as f64 / total_gyms as f64 * 100.0
        } else {
            0.0
        },
    }
}

/// Full outcome of one metro-area run
#[derive(Debug, Serialize)]
pub struct MetroReport {
    pub stats: MetroStats,
    pub gyms: Vec<MergedRecord>,
    // ZIP code -> error message for the searches that failed
    pub failures: BTreeMap<String, String>,
}

/// Fan the search out over a whole metropolitan area
pub async fn run_metro_search(
    search: Arc<GymSearch>,
    metro_code: &str,
    options: SearchOptions,
    max_workers: usize,
    sample_size: Option<usize>,
) -> Result<MetroReport> {
    let metro = metro_area(metro_code)
        .ok_or_else(|| anyhow!("Unknown metropolitan area: {}", metro_code))?;

    let mut zip_codes: Vec<String> = metro.zip_codes.iter().map(|z| z.to_string()).collect();
    if let Some(limit) = sample_size {
        zip_codes.truncate(limit);
        info!(
            "Sample mode: processing {} of {} ZIP codes",
            zip_codes.len(),
            metro.zip_codes.len()
        );
    }

    info!(
        "{} metropolitan area: {} ZIP codes, {} market",
        metro.name,
        zip_codes.len(),
        metro.density_category
    );

    let results = run_batch_search(search, &zip_codes, options, max_workers).await;

    let all_gyms: Vec<MergedRecord> = results
        .values()
        .filter_map(|r| r.as_ref().ok())
        .flat_map(|r| r.records.iter().cloned())
        .collect();

    let before = all_gyms.len();
    let gyms = dedup_across_zips(all_gyms);
    info!(
        "Metro deduplication removed {} of {} records",
        before - gyms.len(),
        before
    );

    let stats = compute_metro_stats(metro, &results, gyms.len());

    let failures = results
        .iter()
        .filter_map(|(zip, r)| r.as_ref().err().map(|e| (zip.clone(), e.to_string())))
        .collect();

    Ok(MetroReport {
        stats,
        gyms,
        failures,
    })
}
