use crate::directory::model::FilterSpec;

#[derive(Debug)]
pub struct Config {
    pub backend: BackendConfig,
    pub listing: ListingConfig,
    pub event_filter: FilterSpec,
    pub venue_search: String,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    /// Zero means a single attempt per fetch
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub featured_events_limit: u32,
    pub home_venues_limit: u32,
}
