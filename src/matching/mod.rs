pub mod geo;
pub mod matcher;
pub mod merge;
pub mod normalizer;
pub mod scoring;
pub mod signals;
pub mod taxonomy;
#[cfg(test)]
mod tests;
pub mod types;

pub use geo::{haversine_miles, ZipCoordinateIndex};
pub use matcher::{match_records, match_records_with_enrichment};
pub use merge::{merge_pair, merge_results};
pub use scoring::{score_pair, MatchConfig, DEFAULT_CONFIDENCE_THRESHOLD};
pub use types::*;

// Module-level constants
pub const TARGET_MATCH: &str = "match";
