//! Directory API clients. Each provider exposes a `search` over a
//! coordinate + radius and returns validated [`BusinessRecord`]s; response
//! parsing is split from transport so it stays unit-testable.

pub mod google;
pub mod yelp;

pub use google::GooglePlacesClient;
pub use yelp::YelpClient;

use anyhow::Result;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Meters per mile, for the providers' radius parameters
pub const METERS_PER_MILE: f64 = 1609.34;

/// Create the HTTP client shared by the provider implementations
pub fn create_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}
