//! Yelp Fusion business search.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::matching::types::{BusinessRecord, PriceTier, Source};
use crate::TARGET_WEB_REQUEST;

use super::{create_http_client, METERS_PER_MILE};

const SEARCH_URL: &str = "https://api.yelp.com/v3/businesses/search";

/// Categories requested from the search endpoint
const SEARCH_CATEGORIES: &str = "gyms,fitness";

/// Maximum results per search; Yelp caps a single page at 50
const SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct YelpSearchResponse {
    #[serde(default)]
    pub businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize)]
pub struct YelpBusiness {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_phone: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub location: Option<YelpLocation>,
    #[serde(default)]
    pub categories: Vec<YelpCategory>,
    #[serde(default)]
    pub coordinates: Option<YelpCoordinates>,
}

#[derive(Debug, Deserialize)]
pub struct YelpLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct YelpCategory {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct YelpCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Turn an optional provider string into a clean value, dropping
/// placeholders
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("n/a"))
}

/// Validate one raw business into a [`BusinessRecord`].
///
/// Listings without a usable name are rejected; negative review counts are
/// coerced to 0 rather than trusted.
pub fn business_to_record(business: YelpBusiness) -> Option<BusinessRecord> {
    let name = business.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return None;
    }

    let address = business
        .location
        .map(|l| l.display_address.join(", "))
        .unwrap_or_default();

    let mut record = BusinessRecord::new(&name, &address, Source::Yelp);
    record.phone = clean_optional(business.display_phone).or_else(|| clean_optional(business.phone));
    record.rating = business.rating;
    record.review_count = business
        .review_count
        .filter(|c| *c >= 0)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0);
    record.price = business
        .price
        .as_deref()
        .map(PriceTier::from_symbol)
        .unwrap_or_default();
    record.url = clean_optional(business.url);
    record.categories = business
        .categories
        .into_iter()
        .map(|c| c.title)
        .filter(|t| !t.is_empty())
        .collect();
    record.coordinates = business.coordinates.and_then(|c| match (c.latitude, c.longitude) {
        (Some(lat), Some(lng)) => Some(crate::matching::types::Coordinates { lat, lng }),
        _ => None,
    });
    record.provider_id = clean_optional(business.id);

    Some(record)
}

/// Parse a full search response into validated records
pub fn parse_search_response(response: YelpSearchResponse) -> Vec<BusinessRecord> {
    response
        .businesses
        .into_iter()
        .filter_map(business_to_record)
        .collect()
}

#[derive(Debug, Clone)]
pub struct YelpClient {
    api_key: String,
    client: reqwest::Client,
}

impl YelpClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(YelpClient {
            api_key: api_key.to_string(),
            client: create_http_client()?,
        })
    }

    /// Search for gyms around a coordinate
    pub async fn search(&self, lat: f64, lng: f64, radius_miles: f64) -> Result<Vec<BusinessRecord>> {
        let radius_meters = (radius_miles * METERS_PER_MILE) as u32;

        debug!(
            target: TARGET_WEB_REQUEST,
            "Yelp search at ({:.4}, {:.4}) radius {}m", lat, lng, radius_meters
        );

        let response = self
            .client
            .get(SEARCH_URL)
            .bearer_auth(&self.api_key)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("categories", SEARCH_CATEGORIES.to_string()),
                ("radius", radius_meters.to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
                ("sort_by", "distance".to_string()),
            ])
            .send()
            .await
            .context("Yelp search request failed")?;

        if !response.status().is_success() {
            warn!(
                target: TARGET_WEB_REQUEST,
                "Yelp search returned HTTP {}", response.status()
            );
            anyhow::bail!("Yelp API HTTP error {}", response.status());
        }

        let parsed: YelpSearchResponse = response
            .json()
            .await
            .context("Invalid JSON response from Yelp API")?;

        Ok(parse_search_response(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "businesses": [
            {
                "id": "iron-temple-new-york",
                "name": "Iron Temple",
                "display_phone": "(212) 555-0001",
                "rating": 4.5,
                "review_count": 210,
                "price": "$$",
                "url": "https://www.yelp.com/biz/iron-temple-new-york",
                "location": {
                    "display_address": ["100 W 20th St", "New York, NY 10011"]
                },
                "categories": [{"alias": "gyms", "title": "Gyms"}],
                "coordinates": {"latitude": 40.7415, "longitude": -74.0007}
            },
            {
                "id": "nameless",
                "name": "   ",
                "review_count": 3
            },
            {
                "id": "sparse-listing",
                "name": "Sparse Listing",
                "review_count": -5,
                "price": "N/A",
                "display_phone": ""
            }
        ]
    }"#;

    #[test]
    fn test_parse_search_response_fixture() {
        let response: YelpSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let records = parse_search_response(response);

        // The nameless listing is rejected
        assert_eq!(records.len(), 2);

        let full = &records[0];
        assert_eq!(full.name, "Iron Temple");
        assert_eq!(full.address, "100 W 20th St, New York, NY 10011");
        assert_eq!(full.phone.as_deref(), Some("(212) 555-0001"));
        assert_eq!(full.rating, Some(4.5));
        assert_eq!(full.review_count, 210);
        assert_eq!(full.price, PriceTier::Moderate);
        assert_eq!(full.categories, vec!["Gyms"]);
        assert!(full.coordinates.is_some());
        assert_eq!(full.provider_id.as_deref(), Some("iron-temple-new-york"));
        assert_eq!(full.source, Source::Yelp);
    }

    #[test]
    fn test_sparse_listing_gets_safe_defaults() {
        let response: YelpSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let records = parse_search_response(response);
        let sparse = &records[1];

        assert_eq!(sparse.name, "Sparse Listing");
        assert_eq!(sparse.review_count, 0, "negative counts are coerced");
        assert_eq!(sparse.price, PriceTier::Unknown);
        assert_eq!(sparse.phone, None, "empty phone becomes absent");
        assert!(sparse.coordinates.is_none());
    }

    #[test]
    fn test_empty_response_parses() {
        let response: YelpSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parse_search_response(response).is_empty());
    }
}
