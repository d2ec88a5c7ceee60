pub mod batch;
pub mod display;
pub mod environment;
pub mod export;
pub mod geocode;
pub mod logging;
pub mod matching;
pub mod metro;
pub mod providers;
pub mod search;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_GEO: &str = "geo";
