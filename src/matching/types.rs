use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory API a record was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Yelp,
    GooglePlaces,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Yelp => write!(f, "Yelp"),
            Source::GooglePlaces => write!(f, "Google Places"),
        }
    }
}

/// Label describing which side(s) produced an output record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLabel {
    Yelp,
    GooglePlaces,
    Merged,
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Yelp => write!(f, "Yelp"),
            SourceLabel::GooglePlaces => write!(f, "Google Places"),
            SourceLabel::Merged => write!(f, "Merged (Yelp + Google)"),
        }
    }
}

impl From<Source> for SourceLabel {
    fn from(source: Source) -> Self {
        match source {
            Source::Yelp => SourceLabel::Yelp,
            Source::GooglePlaces => SourceLabel::GooglePlaces,
        }
    }
}

/// Four-tier price scale shared by both providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[default]
    Unknown,
    Budget,
    Moderate,
    Premium,
    Luxury,
}

impl PriceTier {
    /// Parse a Yelp-style dollar-sign symbol
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim() {
            "$" => PriceTier::Budget,
            "$$" => PriceTier::Moderate,
            "$$$" => PriceTier::Premium,
            "$$$$" => PriceTier::Luxury,
            _ => PriceTier::Unknown,
        }
    }

    /// Numeric level on Google's 1-4 scale, if known
    pub fn level(&self) -> Option<u8> {
        match self {
            PriceTier::Unknown => None,
            PriceTier::Budget => Some(1),
            PriceTier::Moderate => Some(2),
            PriceTier::Premium => Some(3),
            PriceTier::Luxury => Some(4),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceTier::Unknown => "N/A",
            PriceTier::Budget => "$",
            PriceTier::Moderate => "$$",
            PriceTier::Premium => "$$$",
            PriceTier::Luxury => "$$$$",
        }
    }
}

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Opening-hours metadata as far as the providers expose it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    // True when the provider returned structured period data
    pub has_structured: bool,

    // Live open/closed flag, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,

    // Human-readable per-day descriptions ("Monday: 6AM-10PM", ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
}

/// A single business listing as returned by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,

    pub address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: u32,

    #[serde(default)]
    pub price: PriceTier,

    // Provider listing URL (Yelp business page or Google Maps link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // The business's own website, when the provider exposes it separately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    // Free-text categories (Yelp) or type tags (Google)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<OpeningHours>,

    // Provider-specific identifier (Yelp business id, Google place id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    pub source: Source,
}

impl BusinessRecord {
    pub fn new(name: &str, address: &str, source: Source) -> Self {
        BusinessRecord {
            name: name.to_string(),
            address: address.to_string(),
            phone: None,
            rating: None,
            review_count: 0,
            price: PriceTier::Unknown,
            url: None,
            website: None,
            categories: Vec::new(),
            coordinates: None,
            hours: None,
            provider_id: None,
            source,
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = Some(rating);
        self.review_count = review_count;
        self
    }

    pub fn with_price(mut self, price: PriceTier) -> Self {
        self.price = price;
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }

    pub fn with_hours(mut self, hours: OpeningHours) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_provider_id(mut self, id: &str) -> Self {
        self.provider_id = Some(id.to_string());
        self
    }
}

/// Pre-fetched enrichment data for one listing, consulted as an optional
/// bonus signal. Produced by a detail-lookup collaborator outside the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSignals {
    // Fraction of the provider profile that is filled in, 0.0-0.8
    pub profile_completeness: f64,

    // Keyword-derived review sentiment, -1.0 to 1.0
    pub review_sentiment: f64,
}

/// Per-signal weighted contributions making up one confidence score.
///
/// Each field is the value actually added to the aggregate, after weighting
/// and capping, so the breakdown explains the score it accompanies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalBreakdown {
    pub name: f64,
    pub name_boost: f64,
    pub address: f64,
    pub phone: f64,
    pub chain: f64,
    pub proximity: f64,
    pub domain: f64,
    pub category: f64,
    pub price: f64,
    pub hours: f64,
    pub review_count: f64,
    pub quality: f64,
    pub enrichment: f64,
}

impl SignalBreakdown {
    /// Sum of all contributions; equals the aggregate confidence
    pub fn total(&self) -> f64 {
        self.name
            + self.name_boost
            + self.address
            + self.phone
            + self.chain
            + self.proximity
            + self.domain
            + self.category
            + self.price
            + self.hours
            + self.review_count
            + self.quality
            + self.enrichment
    }
}

/// One scored candidate pair evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub confidence: f64,
    pub breakdown: SignalBreakdown,
}

/// A committed left/right assignment
#[derive(Debug, Clone)]
pub struct MatchedPair {
    pub left: BusinessRecord,
    pub right: BusinessRecord,
    pub confidence: f64,
    pub breakdown: SignalBreakdown,
}

/// Full output of one matching run
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub pairs: Vec<MatchedPair>,
    pub left_only: Vec<BusinessRecord>,
    pub right_only: Vec<BusinessRecord>,
}

/// Canonical output record combining up to two source listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRecord {
    pub name: String,
    pub address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: u32,

    #[serde(default)]
    pub price: PriceTier,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<OpeningHours>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    // One member for pass-through records, two for merged ones
    pub sources: Vec<Source>,

    // Raw aggregate score; 0.0 for unmatched records
    pub match_confidence: f64,

    pub source_label: SourceLabel,
}

impl MergedRecord {
    /// Pass an unmatched record through unchanged, tagged with its source
    pub fn from_single(record: BusinessRecord) -> Self {
        let source = record.source;
        MergedRecord {
            name: record.name,
            address: record.address,
            phone: record.phone,
            rating: record.rating,
            review_count: record.review_count,
            price: record.price,
            url: record.url,
            website: record.website,
            categories: record.categories,
            coordinates: record.coordinates,
            hours: record.hours,
            provider_id: record.provider_id,
            sources: vec![source],
            match_confidence: 0.0,
            source_label: source.into(),
        }
    }
}
