//! ZIP-code geocoding through the Nominatim HTTP API.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::matching::types::Coordinates;
use crate::providers::create_http_client;
use crate::TARGET_GEO;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = "gymintel-cli";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new() -> Result<Self> {
        Ok(Geocoder {
            client: create_http_client()?,
            base_url: NOMINATIM_URL.to_string(),
        })
    }

    /// Point the geocoder at a different Nominatim instance
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Resolve a US ZIP code to coordinates. Unresolvable input is a valid
    /// `None`, not an error; only transport failures propagate.
    pub async fn resolve_zip(&self, zipcode: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("q", format!("{}, USA", zipcode)),
                ("format", "json".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .context("Geocoding request failed")?;

        if !response.status().is_success() {
            warn!(target: TARGET_GEO, "Geocoder returned HTTP {}", response.status());
            anyhow::bail!("Geocoder HTTP error {}", response.status());
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .context("Invalid JSON response from geocoder")?;

        let Some(place) = places.into_iter().next() else {
            debug!(target: TARGET_GEO, "No geocoding result for {}", zipcode);
            return Ok(None);
        };

        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => {
                debug!(target: TARGET_GEO, "Resolved {} to ({:.4}, {:.4})", zipcode, lat, lng);
                Ok(Some(Coordinates { lat, lng }))
            }
            _ => {
                warn!(target: TARGET_GEO, "Unparseable coordinates for {}", zipcode);
                Ok(None)
            }
        }
    }
}
