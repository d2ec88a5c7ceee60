//! Coordinate math and the ZIP-code coordinate index used for proximity
//! scoring when a listing carries no geocoded point of its own.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::types::Coordinates;

/// Earth radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

lazy_static! {
    static ref ZIP_CODE: Regex = Regex::new(r"\b(\d{5})\b").unwrap();
    static ref LEADING_NUMBER: Regex = Regex::new(r"^(\d+)").unwrap();
}

/// Great-circle distance between two points in miles
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * h.sqrt().asin() * EARTH_RADIUS_MILES
}

/// Centroids for Manhattan ZIP codes, used as the default index
const NYC_ZIP_CENTROIDS: &[(&str, f64, f64)] = &[
    ("10001", 40.7484, -73.9940), // Midtown West
    ("10002", 40.7156, -73.9898), // Lower East Side
    ("10003", 40.7310, -73.9898), // East Village
    ("10004", 40.7047, -74.0142), // Financial District
    ("10005", 40.7063, -74.0088), // Financial District
    ("10006", 40.7095, -74.0129), // Financial District
    ("10007", 40.7135, -74.0073), // Financial District
    ("10009", 40.7264, -73.9776), // East Village
    ("10010", 40.7390, -73.9826), // Gramercy
    ("10011", 40.7415, -74.0007), // Chelsea
    ("10012", 40.7259, -73.9997), // SoHo
    ("10013", 40.7195, -74.0055), // Tribeca
    ("10014", 40.7336, -74.0063), // West Village
    ("10016", 40.7452, -73.9764), // Gramercy
    ("10017", 40.7520, -73.9717), // Midtown East
    ("10018", 40.7549, -73.9934), // Midtown West
    ("10019", 40.7648, -73.9808), // Midtown West
    ("10020", 40.7589, -73.9774), // Midtown
    ("10021", 40.7685, -73.9540), // Upper East Side
    ("10022", 40.7574, -73.9718), // Midtown East
    ("10023", 40.7756, -73.9828), // Upper West Side
    ("10024", 40.7817, -73.9759), // Upper West Side
    ("10025", 40.7957, -73.9667), // Upper West Side
    ("10026", 40.7984, -73.9537), // Harlem
    ("10027", 40.8075, -73.9533), // Harlem
    ("10028", 40.7764, -73.9531), // Upper East Side
    ("10029", 40.7917, -73.9441), // East Harlem
    ("10030", 40.8180, -73.9425), // Harlem
];

/// ZIP-to-centroid lookup table, passed into the match configuration
/// rather than living as process-wide state.
#[derive(Debug, Clone, Default)]
pub struct ZipCoordinateIndex {
    centroids: HashMap<String, Coordinates>,
}

impl ZipCoordinateIndex {
    /// Build an index from explicit entries
    pub fn from_entries(entries: &[(&str, f64, f64)]) -> Self {
        let centroids = entries
            .iter()
            .map(|(zip, lat, lng)| (zip.to_string(), Coordinates { lat: *lat, lng: *lng }))
            .collect();
        ZipCoordinateIndex { centroids }
    }

    /// Default index covering the Manhattan ZIP codes the tool ships with
    pub fn nyc_default() -> Self {
        Self::from_entries(NYC_ZIP_CENTROIDS)
    }

    /// Index with no entries; proximity falls back to explicit coordinates
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, zipcode: &str) -> Option<Coordinates> {
        self.centroids.get(zipcode).copied()
    }

    /// Estimate a listing's coordinates from its address: ZIP centroid plus
    /// a deterministic offset derived from the street number (roughly 10m
    /// per unit, keeping neighboring addresses distinguishable).
    pub fn estimate(&self, address: &str) -> Option<Coordinates> {
        let zipcode = ZIP_CODE.captures(address)?.get(1)?.as_str().to_string();
        let base = self.lookup(&zipcode)?;

        if let Some(captures) = LEADING_NUMBER.captures(address.trim()) {
            if let Ok(street_number) = captures[1].parse::<u32>() {
                let lat_offset = f64::from(street_number % 100) * 0.0001;
                let lng_offset = f64::from((street_number / 100) % 100) * 0.0001;
                return Some(Coordinates {
                    lat: base.lat + lat_offset,
                    lng: base.lng + lng_offset,
                });
            }
        }

        Some(base)
    }
}

/// First 5-digit ZIP code appearing in an address, if any
pub fn extract_zip(address: &str) -> Option<&str> {
    ZIP_CODE
        .captures(address)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
