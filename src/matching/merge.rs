//! Construction of canonical merged records from matched pairs.
//!
//! Field precedence is fixed: the left (Yelp) source wins on name, phone,
//! price, and listing URL; the right (Google) source supplies geo and
//! categorical metadata the left side lacks; numeric popularity fields
//! take the maximum. Inputs are never mutated.

use super::types::{MatchResult, MatchedPair, MergedRecord, PriceTier, SourceLabel};

/// Merge one matched pair into a canonical record
pub fn merge_pair(pair: &MatchedPair) -> MergedRecord {
    let left = &pair.left;
    let right = &pair.right;

    // The longer address usually carries the fuller ZIP/state suffix
    let address = if right.address.len() > left.address.len() {
        right.address.clone()
    } else {
        left.address.clone()
    };

    let phone = left.phone.clone().or_else(|| right.phone.clone());

    // Google ratings refresh faster; fall back to Yelp
    let rating = right.rating.or(left.rating);

    let price = if left.price != PriceTier::Unknown {
        left.price
    } else {
        right.price
    };

    let website = left.website.clone().or_else(|| right.website.clone());

    // Right-side categorical/geo metadata fills whatever the left lacks
    let categories = if left.categories.is_empty() {
        right.categories.clone()
    } else {
        left.categories.clone()
    };
    let coordinates = left.coordinates.or(right.coordinates);
    let hours = left.hours.clone().or_else(|| right.hours.clone());
    let provider_id = right.provider_id.clone().or_else(|| left.provider_id.clone());

    MergedRecord {
        name: left.name.clone(),
        address,
        phone,
        rating,
        review_count: left.review_count.max(right.review_count),
        price,
        url: left.url.clone().or_else(|| right.url.clone()),
        website,
        categories,
        coordinates,
        hours,
        provider_id,
        sources: vec![left.source, right.source],
        match_confidence: pair.confidence,
        source_label: SourceLabel::Merged,
    }
}

/// Flatten a match result into the terminal output list: merged pairs
/// first, then left-only and right-only pass-throughs.
pub fn merge_results(result: MatchResult) -> Vec<MergedRecord> {
    let mut merged: Vec<MergedRecord> = result.pairs.iter().map(merge_pair).collect();

    merged.extend(result.left_only.into_iter().map(MergedRecord::from_single));
    merged.extend(result.right_only.into_iter().map(MergedRecord::from_single));

    merged
}
