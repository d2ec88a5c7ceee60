//! Curated fitness-industry vocabulary used by the signal scorers: generic
//! stop-words, semantic name groups, chain/franchise aliases, and the
//! category taxonomy bridging Yelp's free-text categories to Google's type
//! tags. Static tables are the defaults; callers needing different
//! vocabulary construct their own scorers around them.

/// Generic gym words that carry no discriminative value between two names
pub const NAME_STOP_WORDS: &[&str] = &[
    "gym", "fitness", "center", "club", "studio", "training", "academy", "health", "wellness",
];

/// Clusters of terms that imply the same fitness discipline. Two names
/// drawing from one cluster are semantically related even when their
/// surface forms share nothing.
pub const SEMANTIC_GROUPS: &[(&str, &[&str])] = &[
    ("crossfit", &["crossfit", "cf", "cross fit"]),
    ("yoga", &["yoga", "yogi", "namaste", "zen"]),
    ("pilates", &["pilates", "barre", "reformer"]),
    (
        "boxing",
        &["boxing", "box", "fight", "combat", "mma", "mixed martial arts"],
    ),
    ("cycling", &["cycling", "spin", "cycle", "bike", "peloton"]),
    ("dance", &["dance", "ballet", "zumba", "salsa"]),
    (
        "strength",
        &["strength", "powerlifting", "weights", "iron", "barbell"],
    ),
    ("cardio", &["cardio", "treadmill", "running", "marathon"]),
    (
        "martial_arts",
        &["karate", "kung fu", "taekwondo", "judo", "aikido", "bjj", "jiu jitsu"],
    ),
];

/// Known gym chains with their naming variants. Each row is one franchise;
/// a name containing any variant belongs to that chain.
pub const CHAIN_ALIASES: &[&[&str]] = &[
    &["planet fitness", "planet"],
    &["la fitness", "la fit"],
    &["24 hour fitness", "24hr fitness", "24 fitness"],
    &["anytime fitness", "anytime"],
    &["gold's gym", "golds gym", "gold gym"],
    &["crunch fitness", "crunch"],
    &["equinox", "equinox fitness"],
    &["lifetime fitness", "life time"],
    &["snap fitness", "snap"],
    &["curves", "curves fitness"],
    &["orange theory", "orangetheory"],
    &["f45", "f45 training"],
    &["crossfit", "cf", "cross fit"],
    &["soulcycle", "soul cycle"],
    &["barry's bootcamp", "barrys", "barry"],
    &["pure barre", "purebarre"],
    &["flywheel", "flywheel sports"],
    &["blink fitness", "blink"],
    &["new york sports club", "nysc"],
];

/// One business-type group in the category taxonomy
#[derive(Debug, Clone, Copy)]
pub struct CategoryGroup {
    pub name: &'static str,
    // Keywords looked for in Yelp's free-text category string
    pub keywords: &'static [&'static str],
    // Google Places type tags this group is expected to carry
    pub tags: &'static [&'static str],
    // Relative confidence weight of this group, 0.0-1.0
    pub weight: f64,
}

/// Taxonomy bridging the two providers' category vocabularies
pub const CATEGORY_TAXONOMY: &[CategoryGroup] = &[
    CategoryGroup {
        name: "traditional_gym",
        keywords: &["gym", "gyms", "fitness"],
        tags: &["gym", "fitness_center", "health"],
        weight: 1.0,
    },
    CategoryGroup {
        name: "boutique_studio",
        keywords: &["yoga", "pilates", "barre", "cycling", "spin"],
        tags: &["yoga_studio", "pilates_studio", "fitness_center", "health", "wellness"],
        weight: 0.9,
    },
    CategoryGroup {
        name: "martial_arts",
        keywords: &["martial", "boxing", "mma", "karate", "jiu jitsu", "taekwondo"],
        tags: &["martial_arts_school", "gym", "health"],
        weight: 0.9,
    },
    CategoryGroup {
        name: "dance",
        keywords: &["dance", "ballet", "zumba"],
        tags: &["dance_school", "health", "wellness"],
        weight: 0.8,
    },
    CategoryGroup {
        name: "specialized_training",
        keywords: &["trainers", "training", "bootcamp", "crossfit"],
        tags: &["gym", "fitness_center", "personal_trainer"],
        weight: 0.85,
    },
    CategoryGroup {
        name: "wellness",
        keywords: &["wellness", "health", "spa"],
        tags: &["spa", "health", "wellness"],
        weight: 0.7,
    },
];

/// Index of the chain a name belongs to, if any
pub fn chain_group(name: &str) -> Option<usize> {
    let lowered = name.to_lowercase();
    CHAIN_ALIASES
        .iter()
        .position(|variants| variants.iter().any(|v| lowered.contains(v)))
}

/// True when both names contain a variant of the same franchise
pub fn shared_chain(name1: &str, name2: &str) -> bool {
    if name1.trim().is_empty() || name2.trim().is_empty() {
        return false;
    }
    let lowered1 = name1.to_lowercase();
    let lowered2 = name2.to_lowercase();
    CHAIN_ALIASES.iter().any(|variants| {
        variants.iter().any(|v| lowered1.contains(v)) && variants.iter().any(|v| lowered2.contains(v))
    })
}

/// True when both names draw a term from the same semantic cluster
pub fn shared_semantic_group(name1: &str, name2: &str) -> bool {
    if name1.trim().is_empty() || name2.trim().is_empty() {
        return false;
    }
    let lowered1 = name1.to_lowercase();
    let lowered2 = name2.to_lowercase();
    SEMANTIC_GROUPS.iter().any(|(_, terms)| {
        terms.iter().any(|t| lowered1.contains(t)) && terms.iter().any(|t| lowered2.contains(t))
    })
}
