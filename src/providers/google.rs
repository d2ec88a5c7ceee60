//! Google Places (New) nearby search and optional place-details enrichment.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::matching::types::{
    BusinessRecord, Coordinates, EnrichmentSignals, OpeningHours, PriceTier, Source,
};
use crate::TARGET_WEB_REQUEST;

use super::{create_http_client, METERS_PER_MILE};

const SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";
const DETAILS_URL: &str = "https://places.googleapis.com/v1/places";

/// Fields requested from the nearby-search endpoint
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.internationalPhoneNumber,places.rating,\
places.userRatingCount,places.priceLevel,places.websiteUri,places.location,\
places.types,places.currentOpeningHours,places.regularOpeningHours";

/// Fields requested from the details endpoint for enrichment
const DETAILS_FIELD_MASK: &str = "displayName,formattedAddress,nationalPhoneNumber,\
websiteUri,regularOpeningHours,rating,userRatingCount,editorialSummary,reviews,photos";

/// The new API caps a single nearby search at 20 places
const MAX_RESULT_COUNT: u32 = 20;

/// Sentiment keyword lists for the enrichment signal
const POSITIVE_KEYWORDS: &[&str] = &[
    "great", "excellent", "amazing", "love", "recommend", "clean", "friendly", "helpful",
];
const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "dirty", "rude", "expensive", "crowded", "broken",
];

#[derive(Debug, Deserialize)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<DisplayName>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<i64>,
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub current_opening_hours: Option<GoogleHours>,
    #[serde(default)]
    pub regular_opening_hours: Option<GoogleHours>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
    #[serde(default)]
    pub periods: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[serde(default)]
    pub display_name: Option<DisplayName>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub regular_opening_hours: Option<GoogleHours>,
    #[serde(default)]
    pub editorial_summary: Option<serde_json::Value>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub photos: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub text: Option<ReviewText>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewText {
    #[serde(default)]
    pub text: String,
}

/// Map the new API's string price levels onto the shared tier scale
pub fn price_tier_from_level(price_level: Option<&str>) -> PriceTier {
    match price_level {
        Some("PRICE_LEVEL_INEXPENSIVE") => PriceTier::Budget,
        Some("PRICE_LEVEL_MODERATE") => PriceTier::Moderate,
        Some("PRICE_LEVEL_EXPENSIVE") => PriceTier::Premium,
        Some("PRICE_LEVEL_VERY_EXPENSIVE") => PriceTier::Luxury,
        // PRICE_LEVEL_FREE has no tier on the four-step scale
        _ => PriceTier::Unknown,
    }
}

fn hours_from_google(hours: GoogleHours) -> OpeningHours {
    OpeningHours {
        has_structured: hours.periods.is_some() || !hours.weekday_descriptions.is_empty(),
        open_now: hours.open_now,
        weekday_text: hours.weekday_descriptions,
    }
}

/// Validate one raw place into a [`BusinessRecord`]; places without a
/// display name are rejected.
pub fn place_to_record(place: Place) -> Option<BusinessRecord> {
    let name = place
        .display_name
        .as_ref()
        .map(|d| d.text.trim().to_string())
        .unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let address = place
        .formatted_address
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    let place_id = place
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    let website = place
        .website_uri
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string);

    // Fall back to a maps link so every listing stays clickable
    let url = website.clone().or_else(|| {
        place_id
            .as_ref()
            .map(|id| format!("https://maps.google.com/?place_id={}", id))
    });

    let mut record = BusinessRecord::new(&name, &address, Source::GooglePlaces);
    record.phone = place
        .national_phone_number
        .or(place.international_phone_number)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    record.rating = place.rating;
    record.review_count = place
        .user_rating_count
        .filter(|c| *c >= 0)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0);
    record.price = price_tier_from_level(place.price_level.as_deref());
    record.url = url;
    record.website = website;
    record.categories = place.types;
    record.coordinates = place.location.and_then(|l| match (l.latitude, l.longitude) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    });
    record.hours = place
        .current_opening_hours
        .or(place.regular_opening_hours)
        .map(hours_from_google);
    record.provider_id = place_id;

    Some(record)
}

/// Parse a full nearby-search response into validated records
pub fn parse_search_response(response: PlacesSearchResponse) -> Vec<BusinessRecord> {
    response.places.into_iter().filter_map(place_to_record).collect()
}

/// Keyword sentiment over the first five reviews, -1.0 to 1.0
pub fn review_sentiment(reviews: &[Review]) -> f64 {
    let mut total = 0.0;
    let mut scored = 0u32;

    for review in reviews.iter().take(5) {
        let Some(text) = review.text.as_ref().map(|t| t.text.to_lowercase()) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }

        let positive = POSITIVE_KEYWORDS.iter().filter(|k| text.contains(*k)).count() as f64;
        let negative = NEGATIVE_KEYWORDS.iter().filter(|k| text.contains(*k)).count() as f64;

        if positive + negative > 0.0 {
            total += (positive - negative) / (positive + negative);
            scored += 1;
        }
    }

    if scored > 0 {
        total / f64::from(scored)
    } else {
        0.0
    }
}

/// How complete the provider profile is, capped at 0.8
pub fn profile_completeness(details: &PlaceDetails) -> f64 {
    let mut score: f64 = 0.0;

    if details.display_name.is_some() {
        score += 0.1;
    }
    if details.formatted_address.is_some() {
        score += 0.1;
    }
    if details.national_phone_number.is_some() {
        score += 0.1;
    }
    if details.website_uri.is_some() {
        score += 0.15;
    }
    if details.regular_opening_hours.is_some() {
        score += 0.1;
    }
    if !details.photos.is_empty() {
        score += 0.1;
    }
    if !details.reviews.is_empty() {
        score += 0.1;
    }
    if details.editorial_summary.is_some() {
        score += 0.05;
    }

    score.min(0.8)
}

/// Reduce full place details to the two enrichment signals the matcher uses
pub fn details_to_signals(details: &PlaceDetails) -> EnrichmentSignals {
    EnrichmentSignals {
        profile_completeness: profile_completeness(details),
        review_sentiment: review_sentiment(&details.reviews),
    }
}

#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    api_key: String,
    client: reqwest::Client,
}

impl GooglePlacesClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(GooglePlacesClient {
            api_key: api_key.to_string(),
            client: create_http_client()?,
        })
    }

    /// Search for gyms around a coordinate
    pub async fn search(&self, lat: f64, lng: f64, radius_miles: f64) -> Result<Vec<BusinessRecord>> {
        let radius_meters = radius_miles * METERS_PER_MILE;

        debug!(
            target: TARGET_WEB_REQUEST,
            "Google Places search at ({:.4}, {:.4}) radius {:.0}m", lat, lng, radius_meters
        );

        let payload = json!({
            "includedTypes": ["gym"],
            "locationRestriction": {
                "circle": {
                    "center": {"latitude": lat, "longitude": lng},
                    "radius": radius_meters
                }
            },
            "maxResultCount": MAX_RESULT_COUNT
        });

        let response = self
            .client
            .post(SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&payload)
            .send()
            .await
            .context("Google Places search request failed")?;

        if !response.status().is_success() {
            warn!(
                target: TARGET_WEB_REQUEST,
                "Google Places search returned HTTP {}", response.status()
            );
            anyhow::bail!("Google Places API HTTP error {}", response.status());
        }

        let parsed: PlacesSearchResponse = response
            .json()
            .await
            .context("Invalid JSON response from Google Places API")?;

        Ok(parse_search_response(parsed))
    }

    /// Fetch place details and reduce them to enrichment signals
    pub async fn enrichment_signals(&self, place_id: &str) -> Result<EnrichmentSignals> {
        let url = format!("{}/{}", DETAILS_URL, place_id);

        let response = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .await
            .context("Google Places details request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Google Places details HTTP error {}", response.status());
        }

        let details: PlaceDetails = response
            .json()
            .await
            .context("Invalid JSON response from Google Places details")?;

        Ok(details_to_signals(&details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "places": [
            {
                "id": "ChIJiron",
                "displayName": {"text": "Iron Temple Gym"},
                "formattedAddress": "100 West 20th Street, New York, NY 10011",
                "nationalPhoneNumber": "(212) 555-0001",
                "rating": 4.6,
                "userRatingCount": 198,
                "priceLevel": "PRICE_LEVEL_MODERATE",
                "websiteUri": "https://www.irontemple.com",
                "location": {"latitude": 40.7415, "longitude": -74.0007},
                "types": ["gym", "health", "point_of_interest"],
                "currentOpeningHours": {
                    "openNow": true,
                    "weekdayDescriptions": ["Monday: 6AM-11PM"]
                }
            },
            {
                "id": "ChIJnameless",
                "formattedAddress": "somewhere"
            },
            {
                "id": "ChIJsparse",
                "displayName": {"text": "Sparse Place"},
                "userRatingCount": -1
            }
        ]
    }"#;

    #[test]
    fn test_parse_search_response_fixture() {
        let response: PlacesSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let records = parse_search_response(response);

        assert_eq!(records.len(), 2, "nameless place is rejected");

        let full = &records[0];
        assert_eq!(full.name, "Iron Temple Gym");
        assert_eq!(full.phone.as_deref(), Some("(212) 555-0001"));
        assert_eq!(full.price, PriceTier::Moderate);
        assert_eq!(full.website.as_deref(), Some("https://www.irontemple.com"));
        assert_eq!(full.url.as_deref(), Some("https://www.irontemple.com"));
        assert_eq!(full.review_count, 198);
        assert_eq!(full.source, Source::GooglePlaces);
        let hours = full.hours.as_ref().unwrap();
        assert!(hours.has_structured);
        assert_eq!(hours.open_now, Some(true));
    }

    #[test]
    fn test_sparse_place_falls_back_to_maps_link() {
        let response: PlacesSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let records = parse_search_response(response);
        let sparse = &records[1];

        assert_eq!(sparse.review_count, 0);
        assert_eq!(sparse.website, None);
        assert_eq!(
            sparse.url.as_deref(),
            Some("https://maps.google.com/?place_id=ChIJsparse")
        );
    }

    #[test]
    fn test_price_tier_from_level() {
        assert_eq!(
            price_tier_from_level(Some("PRICE_LEVEL_INEXPENSIVE")),
            PriceTier::Budget
        );
        assert_eq!(
            price_tier_from_level(Some("PRICE_LEVEL_VERY_EXPENSIVE")),
            PriceTier::Luxury
        );
        assert_eq!(price_tier_from_level(Some("PRICE_LEVEL_FREE")), PriceTier::Unknown);
        assert_eq!(price_tier_from_level(None), PriceTier::Unknown);
    }

    fn review(text: &str) -> Review {
        Review {
            text: Some(ReviewText {
                text: text.to_string(),
            }),
        }
    }

    #[test]
    fn test_review_sentiment_keywords() {
        let positive = vec![review("Great gym, super clean and friendly staff")];
        assert!(review_sentiment(&positive) > 0.9);

        let negative = vec![review("Dirty and rude, terrible experience")];
        assert!(review_sentiment(&negative) < -0.9);

        let mixed = vec![review("Great equipment but crowded at night")];
        let score = review_sentiment(&mixed);
        assert!(score.abs() < 0.5, "got {score}");

        assert_eq!(review_sentiment(&[]), 0.0);
        assert_eq!(review_sentiment(&[review("meh")]), 0.0);
    }

    #[test]
    fn test_profile_completeness_caps() {
        let empty = PlaceDetails::default();
        assert_eq!(profile_completeness(&empty), 0.0);

        let full: PlaceDetails = serde_json::from_str(
            r#"{
                "displayName": {"text": "Iron Temple"},
                "formattedAddress": "100 W 20th St",
                "nationalPhoneNumber": "(212) 555-0001",
                "websiteUri": "https://www.irontemple.com",
                "regularOpeningHours": {"openNow": true},
                "editorialSummary": {"text": "A gym"},
                "reviews": [{"text": {"text": "great"}}],
                "photos": [{}]
            }"#,
        )
        .unwrap();
        let score = profile_completeness(&full);
        assert!((score - 0.8).abs() < 1e-9, "got {score}");
    }
}
