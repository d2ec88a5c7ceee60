//! End-to-end scenarios exercising the full normalize → score → match →
//! merge pipeline with realistic listings.

use super::matcher::match_records;
use super::merge::merge_results;
use super::normalizer::{normalize_address, normalize_phone};
use super::scoring::{score_pair, MatchConfig, DEFAULT_CONFIDENCE_THRESHOLD};
use super::types::{BusinessRecord, PriceTier, Source, SourceLabel};

fn planet_fitness_yelp() -> BusinessRecord {
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

fn planet_fitness_google() -> BusinessRecord {
    BusinessRecord::new(
        "Planet Fitness Gym",
        "123 Main Street, New York, NY 10001",
        Source::GooglePlaces,
    )
    .with_phone("(555) 123-4567")
    .with_rating(4.1, 95)
    .with_website("https://www.planetfitness.com")
    .with_categories(&["gym", "health"])
    .with_coordinates(40.7484, -73.9940)
    .with_provider_id("pf-place-id")
}

#[test]
fn test_planet_fitness_scenario_merges_with_high_confidence() {
    let config = MatchConfig::default();
    let result = match_records(
        &[planet_fitness_yelp()],
        &[planet_fitness_google()],
        &config,
    );

    assert_eq!(result.pairs.len(), 1);
    let merged = merge_results(result);
    assert_eq!(merged.len(), 1);

    let record = &merged[0];
    assert_eq!(record.sources, vec![Source::Yelp, Source::GooglePlaces]);
    assert_eq!(record.source_label, SourceLabel::Merged);
    assert!(
        record.match_confidence > DEFAULT_CONFIDENCE_THRESHOLD,
        "confidence {} should clear the default threshold",
        record.match_confidence
    );
}

#[test]
fn test_spec_normalization_examples() {
    assert_eq!(normalize_address("123 Main Street"), "123 main st");
    assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
    assert_eq!(normalize_phone("1-555-123-4567"), "5551234567");
}

#[test]
fn test_greedy_claim_accounting_three_by_two() {
    // Three nearly identical left records against two right records, with a
    // threshold low enough that every pairing qualifies: exactly two merges,
    // one left-only, zero right-only, and no right record claimed twice.
    let left = vec![
        BusinessRecord::new("Iron Temple", "100 W 20th St, NY 10011", Source::Yelp),
        BusinessRecord::new("Iron Temple East", "102 W 20th St, NY 10011", Source::Yelp),
        BusinessRecord::new("Iron Temple West", "104 W 20th St, NY 10011", Source::Yelp),
    ];
    let right = vec![
        BusinessRecord::new("Iron Temple", "100 W 20th St, NY 10011", Source::GooglePlaces),
        BusinessRecord::new(
            "Iron Temple East",
            "102 W 20th St, NY 10011",
            Source::GooglePlaces,
        ),
    ];

    let config = MatchConfig::default().with_threshold(0.05);

    // Every pair clears the permissive threshold
    for l in &left {
        for r in &right {
            assert!(score_pair(l, r, None, &config).confidence >= 0.05);
        }
    }

    let result = match_records(&left, &right, &config);
    assert_eq!(result.pairs.len(), 2);
    assert_eq!(result.left_only.len(), 1);
    assert_eq!(result.right_only.len(), 0);

    let merged = merge_results(result);
    assert_eq!(merged.len(), 3);
    let merged_count = merged
        .iter()
        .filter(|m| m.source_label == SourceLabel::Merged)
        .count();
    assert_eq!(merged_count, 2);
}

#[test]
fn test_equinox_chain_bonus_despite_dissimilar_addresses() {
    let config = MatchConfig::default();
    let left = BusinessRecord::new(
        "Equinox Tribeca",
        "54 Murray St, New York, NY 10007",
        Source::Yelp,
    );
    let right = BusinessRecord::new(
        "Equinox Upper East Side",
        "205 E 85th St, New York, NY 10028",
        Source::GooglePlaces,
    );

    let scored = score_pair(&left, &right, None, &config);
    assert!(scored.breakdown.chain > 0.0, "chain bonus expected");
}

#[test]
fn test_zero_signal_pair_never_matches_at_default_threshold() {
    let config = MatchConfig::default();
    let left = BusinessRecord::new("Quiet Earth Pottery", "", Source::Yelp);
    let right = BusinessRecord::new("Vantage Accounting", "", Source::GooglePlaces);

    let scored = score_pair(&left, &right, None, &config);
    assert!(scored.confidence < DEFAULT_CONFIDENCE_THRESHOLD);

    let result = match_records(
        std::slice::from_ref(&left),
        std::slice::from_ref(&right),
        &config,
    );
    assert!(result.pairs.is_empty());

    let merged = merge_results(result);
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().all(|m| m.match_confidence == 0.0));
    assert!(merged.iter().all(|m| m.sources.len() == 1));
}

#[test]
fn test_determinism_across_repeated_runs() {
    let config = MatchConfig::default();
    let left = vec![planet_fitness_yelp()];
    let right = vec![planet_fitness_google()];

    let first = match_records(&left, &right, &config);
    let second = match_records(&left, &right, &config);

    assert_eq!(first.pairs.len(), second.pairs.len());
    assert_eq!(first.pairs[0].confidence, second.pairs[0].confidence);
}

#[test]
fn test_score_headroom_can_exceed_one() {
    // A maximally agreeing pair stacks bonuses past 1.0; the aggregate is
    // a ranking score, not a probability.
    let config = MatchConfig::default();
    let left = planet_fitness_yelp();
    let mut right = planet_fitness_google();
    right.hours = Some(super::types::OpeningHours {
        has_structured: true,
        open_now: Some(true),
        weekday_text: (0..7).map(|i| format!("Day {i}: Open 24 hours")).collect(),
    });
    right.review_count = 100;
    right.price = PriceTier::Moderate;

    let scored = score_pair(&left, &right, None, &config);
    assert!(scored.confidence > 1.0, "got {}", scored.confidence);
    // Per-signal caps bound the theoretical ceiling
    assert!(scored.confidence < 1.7, "got {}", scored.confidence);
}
