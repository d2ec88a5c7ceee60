//! Weighted aggregation of the individual signals into one confidence
//! score per candidate pair.
//!
//! Weights are fixed design constants. The aggregate is deliberately not
//! normalized to [0, 1]: independent bonuses can stack past 1.0 and
//! callers threshold the value rather than read it as a probability.

use tracing::debug;

use super::geo::ZipCoordinateIndex;
use super::normalizer::{normalize_address, normalize_phone};
use super::signals;
use super::types::{BusinessRecord, EnrichmentSignals, ScoredPair, SignalBreakdown};
use super::TARGET_MATCH;

/// Weight of the name-similarity signal
pub const NAME_WEIGHT: f64 = 0.30;

/// Weight of the exact (or flagged partial) phone signal
pub const PHONE_WEIGHT: f64 = 0.15;

/// Weight of the price-tier signal
pub const PRICE_WEIGHT: f64 = 0.05;

/// Chain agreement is halved so a franchise name alone cannot dominate
pub const CHAIN_DAMPING: f64 = 0.5;

/// Mutually exclusive boosts for excellent name agreement
const NAME_BOOST_EXCELLENT: (f64, f64) = (0.9, 0.05);
const NAME_BOOST_STRONG: (f64, f64) = (0.8, 0.03);
const NAME_BOOST_GOOD: (f64, f64) = (0.7, 0.02);

/// Default minimum confidence for committing a match
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.35;

/// Tunable knobs of one matching run. Weights stay fixed; the threshold,
/// the legacy phone rule, and the ZIP coordinate index are injectable.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum aggregate score for a pair to be committed
    pub threshold: f64,

    /// Enable the legacy last-7/last-4 phone-suffix credit
    pub partial_phone_matching: bool,

    /// ZIP-to-centroid index consulted when a listing has no coordinates
    pub zip_index: ZipCoordinateIndex,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            partial_phone_matching: false,
            zip_index: ZipCoordinateIndex::nyc_default(),
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_partial_phone_matching(mut self, enabled: bool) -> Self {
        self.partial_phone_matching = enabled;
        self
    }

    pub fn with_zip_index(mut self, zip_index: ZipCoordinateIndex) -> Self {
        self.zip_index = zip_index;
        self
    }
}

/// Highest applicable name boost, or 0
fn name_boost(name_similarity: f64) -> f64 {
    for (floor, boost) in [NAME_BOOST_EXCELLENT, NAME_BOOST_STRONG, NAME_BOOST_GOOD] {
        if name_similarity > floor {
            return boost;
        }
    }
    0.0
}

/// Score one candidate pair.
///
/// Deterministic: the same pair (and enrichment data) always produces the
/// same score. Not symmetric: the category taxonomy reads free-text
/// categories from the left side and type tags from the right, matching
/// the Yelp-left / Google-right calling convention.
pub fn score_pair(
    left: &BusinessRecord,
    right: &BusinessRecord,
    enrichment: Option<&EnrichmentSignals>,
    config: &MatchConfig,
) -> ScoredPair {
    let left_address = normalize_address(&left.address);
    let right_address = normalize_address(&right.address);
    let left_phone = normalize_phone(left.phone.as_deref().unwrap_or(""));
    let right_phone = normalize_phone(right.phone.as_deref().unwrap_or(""));

    let name_similarity = signals::name_similarity(&left.name, &right.name);

    let breakdown = SignalBreakdown {
        name: name_similarity * NAME_WEIGHT,
        name_boost: name_boost(name_similarity),
        address: signals::address_similarity(&left_address, &right_address),
        phone: signals::phone_signal(&left_phone, &right_phone, config.partial_phone_matching)
            * PHONE_WEIGHT,
        chain: signals::chain_signal(&left.name, &right.name) * CHAIN_DAMPING,
        proximity: signals::proximity_signal(left, right, &config.zip_index),
        domain: signals::domain_signal(
            left.website.as_deref().or(left.url.as_deref()),
            right.website.as_deref().or(right.url.as_deref()),
        ),
        category: signals::category_signal(&left.categories, &right.categories),
        price: signals::price_signal(left.price, right.price) * PRICE_WEIGHT,
        hours: signals::hours_signal(left.hours.as_ref(), right.hours.as_ref()),
        review_count: signals::review_count_signal(left.review_count, right.review_count),
        quality: signals::website_quality_signal(left, right),
        enrichment: signals::enrichment_signal(enrichment),
    };

    let confidence = breakdown.total();

    debug!(
        target: TARGET_MATCH,
        "Scored '{}' vs '{}': name={:.2} addr={:.2} phone={:.2} total={:.3}",
        left.name,
        right.name,
        breakdown.name,
        breakdown.address,
        breakdown.phone,
        confidence
    );

    ScoredPair {
        confidence,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{PriceTier, Source};

    fn planet_yelp() -> BusinessRecord {
        BusinessRecord::new(
            "Planet Fitness",
            "123 Main St, New York, NY 10001",
            Source::Yelp,
        )
        .with_phone("(555) 123-4567")
        .with_rating(4.0, 100)
        .with_price(PriceTier::Moderate)
        .with_url("https://www.yelp.com/biz/planet-fitness-new-york")
        .with_categories(&["Gyms, Fitness"])
    }

    fn planet_google() -> BusinessRecord {
        BusinessRecord::new(
            "Planet Fitness Gym",
            "123 Main Street, New York, NY 10001",
            Source::GooglePlaces,
        )
        .with_phone("(555) 123-4567")
        .with_rating(4.1, 95)
        .with_website("https://www.planetfitness.com")
        .with_categories(&["gym", "health"])
        .with_provider_id("place-123")
    }

    #[test]
    fn test_score_is_deterministic() {
        let config = MatchConfig::default();
        let left = planet_yelp();
        let right = planet_google();

        let first = score_pair(&left, &right, None, &config);
        let second = score_pair(&left, &right, None, &config);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.breakdown, second.breakdown);
    }

    #[test]
    fn test_strong_pair_clears_default_threshold() {
        let config = MatchConfig::default();
        let scored = score_pair(&planet_yelp(), &planet_google(), None, &config);

        assert!(
            scored.confidence > DEFAULT_CONFIDENCE_THRESHOLD,
            "confidence {} should exceed {}",
            scored.confidence,
            DEFAULT_CONFIDENCE_THRESHOLD
        );
        // Exact names after cleaning earn the top boost
        assert!((scored.breakdown.name_boost - 0.05).abs() < 1e-9);
        assert!((scored.breakdown.phone - PHONE_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_total_equals_confidence() {
        let config = MatchConfig::default();
        let scored = score_pair(&planet_yelp(), &planet_google(), None, &config);
        assert!((scored.breakdown.total() - scored.confidence).abs() < 1e-12);
    }

    #[test]
    fn test_missing_phone_is_neutral_not_penalized() {
        let config = MatchConfig::default();
        let mut without_phone = planet_google();
        without_phone.phone = None;
        let mut empty_phone = planet_google();
        empty_phone.phone = Some(String::new());

        let left = planet_yelp();
        let absent = score_pair(&left, &without_phone, None, &config);
        let empty = score_pair(&left, &empty_phone, None, &config);
        assert_eq!(absent.confidence, empty.confidence);
        assert_eq!(absent.breakdown.phone, 0.0);
    }

    #[test]
    fn test_no_comparable_fields_scores_zero() {
        let config = MatchConfig::default();
        let left = BusinessRecord::new("Aardvark Holdings", "", Source::Yelp);
        let right = BusinessRecord::new("Zenith Partners", "", Source::GooglePlaces);
        let scored = score_pair(&left, &right, None, &config);
        // Unrelated names with no other fields stay near zero and can
        // never cross a threshold <= 1.0 on name residue alone
        assert!(scored.confidence < 0.2, "got {}", scored.confidence);
        assert_eq!(scored.breakdown.address, 0.0);
        assert_eq!(scored.breakdown.phone, 0.0);
    }

    #[test]
    fn test_name_boost_tiers_are_exclusive() {
        assert_eq!(name_boost(0.95), 0.05);
        assert_eq!(name_boost(0.85), 0.03);
        assert_eq!(name_boost(0.75), 0.02);
        assert_eq!(name_boost(0.5), 0.0);
        // Boundary: exactly 0.9 is not "> 0.9"
        assert_eq!(name_boost(0.9), 0.03);
    }

    #[test]
    fn test_asymmetric_category_sides() {
        let config = MatchConfig::default();
        let left = planet_yelp();
        let right = planet_google();

        let forward = score_pair(&left, &right, None, &config);
        let reversed = score_pair(&right, &left, None, &config);
        // The taxonomy reads Yelp text on the left and Google tags on the
        // right, so swapping roles changes the category contribution
        assert!(forward.breakdown.category > 0.0);
        assert_ne!(forward.breakdown.category, reversed.breakdown.category);
    }

    #[test]
    fn test_enrichment_adds_bounded_bonus() {
        let config = MatchConfig::default();
        let enrichment = EnrichmentSignals {
            profile_completeness: 0.8,
            review_sentiment: 1.0,
        };
        let without = score_pair(&planet_yelp(), &planet_google(), None, &config);
        let with = score_pair(&planet_yelp(), &planet_google(), Some(&enrichment), &config);
        assert!(with.confidence > without.confidence);
        assert!(with.confidence - without.confidence <= 0.08 + 1e-9);
    }
}
