//! Independent similarity signals over a candidate pair of listings.
//!
//! Every scorer is pure, deterministic, and bounded, and treats a value
//! missing on either side as a neutral 0 contribution — absence is not
//! evidence of mismatch. Scorers returning a "contribution" are already
//! scaled to the amount they may add to the aggregate; the raw scorers
//! (name, phone, price, chain) are weighted by the aggregator.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use strsim::normalized_levenshtein;

use super::geo::{extract_zip, haversine_miles, ZipCoordinateIndex};
use super::normalizer::{clean_name, extract_domain, fold_name};
use super::taxonomy::{shared_chain, shared_semantic_group, CATEGORY_TAXONOMY, NAME_STOP_WORDS};
use super::types::{BusinessRecord, EnrichmentSignals, OpeningHours, PriceTier};

/// Distance tiers (miles) for the proximity bonus
const PROXIMITY_NEAR_MILES: f64 = 0.1;
const PROXIMITY_CLOSE_MILES: f64 = 0.25;

/// Domains that identify the directory itself rather than the business
const DIRECTORY_DOMAINS: &[&str] = &["yelp.com", "google.com", "maps.google.com"];

lazy_static! {
    static ref STREET_NUMBER: Regex = Regex::new(r"^(\d+)").unwrap();
    static ref STREET_NAME: Regex = Regex::new(r"^\d+\s+([^,]+)").unwrap();
}

/// Best name similarity across four comparison levels: raw edit ratio,
/// cleaned edit ratio, stop-word-free token overlap, and semantic grouping.
pub fn name_similarity(name1: &str, name2: &str) -> f64 {
    if name1.trim().is_empty() || name2.trim().is_empty() {
        return 0.0;
    }

    let folded1 = fold_name(name1);
    let folded2 = fold_name(name2);
    let cleaned1 = clean_name(name1);
    let cleaned2 = clean_name(name2);

    let candidates = [
        normalized_levenshtein(&folded1, &folded2),
        normalized_levenshtein(&cleaned1, &cleaned2),
        token_name_similarity(&folded1, &folded2),
        semantic_name_similarity(&cleaned1, &cleaned2),
    ];

    candidates.into_iter().fold(0.0, f64::max)
}

/// Jaccard similarity of name tokens after removing generic gym words
pub fn token_name_similarity(name1: &str, name2: &str) -> f64 {
    if name1.trim().is_empty() || name2.trim().is_empty() {
        return 0.0;
    }

    let tokens = |name: &str| -> HashSet<String> {
        fold_name(name)
            .split_whitespace()
            .filter(|t| !NAME_STOP_WORDS.contains(t))
            .map(|t| t.to_string())
            .collect()
    };

    let tokens1 = tokens(name1);
    let tokens2 = tokens(name2);

    // Both names were nothing but generic words: treat as identical
    if tokens1.is_empty() && tokens2.is_empty() {
        return 1.0;
    }
    if tokens1.is_empty() || tokens2.is_empty() {
        return 0.0;
    }

    let intersection = tokens1.intersection(&tokens2).count();
    let union = tokens1.union(&tokens2).count();

    intersection as f64 / union as f64
}

/// 0.8 when both names draw from the same fitness-discipline cluster
pub fn semantic_name_similarity(name1: &str, name2: &str) -> f64 {
    if shared_semantic_group(name1, name2) {
        0.8
    } else {
        0.0
    }
}

/// Address contribution: scaled edit ratio plus exact street-number and
/// similar street-name bonuses. Expects already-normalized addresses.
/// Range [0, 0.28].
pub fn address_similarity(addr1: &str, addr2: &str) -> f64 {
    if addr1.is_empty() || addr2.is_empty() {
        return 0.0;
    }

    let mut contribution = normalized_levenshtein(addr1, addr2) * 0.2;

    let number1 = STREET_NUMBER.captures(addr1).map(|c| c[1].to_string());
    let number2 = STREET_NUMBER.captures(addr2).map(|c| c[1].to_string());
    if let (Some(n1), Some(n2)) = (number1, number2) {
        if n1 == n2 {
            contribution += 0.05;
        }
    }

    let street1 = STREET_NAME.captures(addr1).map(|c| c[1].to_string());
    let street2 = STREET_NAME.captures(addr2).map(|c| c[1].to_string());
    if let (Some(s1), Some(s2)) = (street1, street2) {
        if normalized_levenshtein(&s1, &s2) > 0.8 {
            contribution += 0.03;
        }
    }

    contribution
}

/// Raw phone agreement on normalized digit strings. Exact match scores 1.0
/// and requires full 10-digit numbers on both sides. The legacy suffix
/// rules (last 7, last 4) only apply when `allow_partial` is set.
pub fn phone_signal(phone1: &str, phone2: &str, allow_partial: bool) -> f64 {
    if phone1.len() < 10 || phone2.len() < 10 {
        return 0.0;
    }

    if phone1 == phone2 {
        return 1.0;
    }

    if allow_partial {
        if phone1[phone1.len() - 7..] == phone2[phone2.len() - 7..] {
            return 0.6;
        }
        if phone1[phone1.len() - 4..] == phone2[phone2.len() - 4..] {
            return 0.3;
        }
    }

    0.0
}

/// Proximity contribution from shared ZIP code or small haversine distance.
/// Coordinates missing on a side are estimated from the address through the
/// ZIP index; with neither available the signal is neutral.
/// Range {0, 0.03, 0.05}.
pub fn proximity_signal(
    left: &BusinessRecord,
    right: &BusinessRecord,
    zip_index: &ZipCoordinateIndex,
) -> f64 {
    if let (Some(zip1), Some(zip2)) = (extract_zip(&left.address), extract_zip(&right.address)) {
        if zip1 == zip2 {
            return 0.05;
        }
    }

    let coords_left = left.coordinates.or_else(|| zip_index.estimate(&left.address));
    let coords_right = right.coordinates.or_else(|| zip_index.estimate(&right.address));

    if let (Some(a), Some(b)) = (coords_left, coords_right) {
        let distance = haversine_miles(a, b);
        if distance < PROXIMITY_NEAR_MILES {
            return 0.05;
        }
        if distance < PROXIMITY_CLOSE_MILES {
            return 0.03;
        }
    }

    0.0
}

/// 0.05 when both sides resolve to the same business domain. Directory
/// domains (the review site's own pages, bare maps links) never count.
pub fn domain_signal(url1: Option<&str>, url2: Option<&str>) -> f64 {
    let domain1 = url1.map(extract_domain).unwrap_or_default();
    let domain2 = url2.map(extract_domain).unwrap_or_default();

    if domain1.is_empty() || domain2.is_empty() {
        return 0.0;
    }
    if DIRECTORY_DOMAINS.contains(&domain1.as_str()) || DIRECTORY_DOMAINS.contains(&domain2.as_str())
    {
        return 0.0;
    }

    if domain1 == domain2 {
        0.05
    } else {
        0.0
    }
}

/// Category contribution from the taxonomy: a group whose keyword appears
/// in the left side's free-text categories earns its weight when the right
/// side carries the group's expected type tags, scaled by how many of them
/// matched. Range [0, 0.15].
pub fn category_signal(categories: &[String], tags: &[String]) -> f64 {
    if categories.is_empty() || tags.is_empty() {
        return 0.0;
    }

    let category_text = categories.join(" ").to_lowercase();
    let tags_lower: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();

    let mut best = 0.0_f64;
    for group in CATEGORY_TAXONOMY {
        if !group.keywords.iter().any(|k| category_text.contains(k)) {
            continue;
        }

        let matched = group
            .tags
            .iter()
            .filter(|expected| tags_lower.iter().any(|t| t.contains(*expected)))
            .count();
        if matched == 0 {
            continue;
        }

        let breadth = matched as f64 / group.tags.len() as f64;
        let score = group.weight * (0.10 + 0.05 * breadth);
        best = best.max(score);
    }

    best.min(0.15)
}

/// Raw price-tier agreement: 1.0 exact, 0.5 adjacent, 0 otherwise
pub fn price_signal(price1: PriceTier, price2: PriceTier) -> f64 {
    match (price1.level(), price2.level()) {
        (Some(l1), Some(l2)) if l1 == l2 => 1.0,
        (Some(l1), Some(l2)) if l1.abs_diff(l2) == 1 => 0.5,
        _ => 0.0,
    }
}

/// Hours-data contribution: structured schedule present, live open flag,
/// 24-hour operation text, and full-week coverage each add a bounded
/// increment. Range [0, 0.3].
pub fn hours_signal(hours1: Option<&OpeningHours>, hours2: Option<&OpeningHours>) -> f64 {
    if hours1.is_none() && hours2.is_none() {
        return 0.0;
    }

    let both = [hours1, hours2];
    let mut contribution: f64 = 0.0;

    let has_structured = both
        .iter()
        .flatten()
        .any(|h| h.has_structured || !h.weekday_text.is_empty());
    if has_structured {
        contribution += 0.15;
    }

    if both.iter().flatten().any(|h| h.open_now.is_some()) {
        contribution += 0.10;
    }

    let is_24h = both.iter().flatten().any(|h| {
        h.weekday_text.iter().any(|d| {
            let lowered = d.to_lowercase();
            lowered.contains("24 hours") || lowered.contains("open 24")
        })
    });
    if is_24h {
        contribution += 0.05;
    }

    if both.iter().flatten().any(|h| h.weekday_text.len() >= 7) {
        contribution += 0.05;
    }

    contribution.min(0.3)
}

/// Raw chain agreement: 0.2 when both names belong to the same franchise
pub fn chain_signal(name1: &str, name2: &str) -> f64 {
    if shared_chain(name1, name2) {
        0.2
    } else {
        0.0
    }
}

/// Review-count correlation: ratio of the smaller to the larger count,
/// mapped through tiers, with a small floor bonus when both listings are
/// small businesses. A zero count on either side is neutral.
/// Range [0, 0.12].
pub fn review_count_signal(count1: u32, count2: u32) -> f64 {
    if count1 == 0 || count2 == 0 {
        return 0.0;
    }

    let ratio = f64::from(count1.min(count2)) / f64::from(count1.max(count2));
    let mut contribution: f64 = if ratio > 0.8 {
        0.10
    } else if ratio > 0.6 {
        0.07
    } else if ratio > 0.4 {
        0.04
    } else if ratio > 0.2 {
        0.02
    } else {
        0.0
    };

    if count1 <= 10 && count2 <= 10 {
        contribution += 0.02;
    }

    contribution.min(0.12)
}

/// Website-quality heuristic over the right-side listing: a real business
/// site (not a bare maps link), fitness-flavored domain, https, and an
/// established review-profile URL on the left each add a little.
/// Range [0, 0.1].
pub fn website_quality_signal(left: &BusinessRecord, right: &BusinessRecord) -> f64 {
    let mut contribution: f64 = 0.0;

    if let Some(website) = right.website.as_deref().or(right.url.as_deref()) {
        let domain = extract_domain(website);
        if !domain.is_empty() && !DIRECTORY_DOMAINS.contains(&domain.as_str()) {
            contribution += 0.03;

            let fitness_flavored = ["fit", "gym", "yoga", "barre", "box", "athletic"]
                .iter()
                .any(|kw| domain.contains(kw));
            if fitness_flavored {
                contribution += 0.02;
            }

            if website.starts_with("https://") {
                contribution += 0.02;
            }
        }
    }

    if let Some(url) = left.url.as_deref() {
        if extract_domain(url) == "yelp.com" && url.contains("/biz/") {
            contribution += 0.03;
        }
    }

    contribution.min(0.1)
}

/// Bonus from pre-fetched enrichment data; absent data is neutral.
/// Range [0, 0.08].
pub fn enrichment_signal(enrichment: Option<&EnrichmentSignals>) -> f64 {
    let Some(signals) = enrichment else {
        return 0.0;
    };

    let completeness = signals.profile_completeness.clamp(0.0, 0.8) * 0.05;
    let sentiment = signals.review_sentiment.clamp(0.0, 1.0) * 0.04;

    (completeness + sentiment).min(0.08)
}
