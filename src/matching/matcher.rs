//! Greedy one-to-one assignment between the two providers' result sets.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::scoring::{score_pair, MatchConfig};
use super::types::{BusinessRecord, EnrichmentSignals, MatchResult, MatchedPair, SignalBreakdown};
use super::TARGET_MATCH;

/// Match two result sets with the greedy, left-anchored strategy.
///
/// For each left record, in input order, every right record not yet claimed
/// is scored; the best candidate at or above the threshold is committed
/// immediately and never reconsidered. Ties go to the first-encountered
/// right record, so output depends on input order — a deliberate trade-off
/// documented in DESIGN.md. Right records never claimed come back in
/// `right_only`.
///
/// Runs in O(|left| × |right|) scorings; both sets are tens of records per
/// query. Never fails: a record with nothing comparable accumulates a score
/// of 0 and passes through unmatched.
pub fn match_records(
    left: &[BusinessRecord],
    right: &[BusinessRecord],
    config: &MatchConfig,
) -> MatchResult {
    match_records_with_enrichment(left, right, config, &HashMap::new())
}

/// Variant of [`match_records`] consulting pre-fetched enrichment data,
/// keyed by the right record's provider id. Missing entries are neutral.
pub fn match_records_with_enrichment(
    left: &[BusinessRecord],
    right: &[BusinessRecord],
    config: &MatchConfig,
    enrichment: &HashMap<String, EnrichmentSignals>,
) -> MatchResult {
    let mut result = MatchResult::default();
    let mut claimed: HashSet<usize> = HashSet::new();

    info!(
        target: TARGET_MATCH,
        "Matching {} left against {} right records (threshold {:.2})",
        left.len(),
        right.len(),
        config.threshold
    );

    for left_record in left {
        let mut best: Option<(usize, f64, SignalBreakdown)> = None;

        for (index, right_record) in right.iter().enumerate() {
            if claimed.contains(&index) {
                continue;
            }

            let extra = right_record
                .provider_id
                .as_ref()
                .and_then(|id| enrichment.get(id));
            let scored = score_pair(left_record, right_record, extra, config);

            if scored.confidence < config.threshold {
                continue;
            }

            // Strictly-greater keeps the first-encountered candidate on ties
            let improves = match &best {
                Some((_, best_confidence, _)) => scored.confidence > *best_confidence,
                None => true,
            };
            if improves {
                best = Some((index, scored.confidence, scored.breakdown));
            }
        }

        match best {
            Some((index, confidence, breakdown)) => {
                claimed.insert(index);
                debug!(
                    target: TARGET_MATCH,
                    "Matched '{}' <-> '{}' (confidence {:.2})",
                    left_record.name,
                    right[index].name,
                    confidence
                );
                result.pairs.push(MatchedPair {
                    left: left_record.clone(),
                    right: right[index].clone(),
                    confidence,
                    breakdown,
                });
            }
            None => {
                debug!(target: TARGET_MATCH, "No match for '{}'", left_record.name);
                result.left_only.push(left_record.clone());
            }
        }
    }

    for (index, right_record) in right.iter().enumerate() {
        if !claimed.contains(&index) {
            result.right_only.push(right_record.clone());
        }
    }

    info!(
        target: TARGET_MATCH,
        "Matching complete: {} pairs, {} left-only, {} right-only",
        result.pairs.len(),
        result.left_only.len(),
        result.right_only.len()
    );

    result
}
