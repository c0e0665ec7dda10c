use crate::config::model::{BackendConfig, Config, ListingConfig};
use crate::directory::model::FilterSpec;
use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set.")]
    Missing(&'static str),

    #[error("Invalid config '{name}'. Expected {expected}.")]
    Invalid {
        name: &'static str,
        expected: &'static str,
    },
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

/// Builds the config from any variable source, `lookup` returning `None` for unset names
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let backend = BackendConfig {
        url: load_required_config(&lookup, "SUPABASE_URL")?,
        anon_key: load_required_config(&lookup, "SUPABASE_ANON_KEY")?,
        max_retries: load_number_config(&lookup, "BACKEND_MAX_RETRIES", "an integer number")?
            .unwrap_or(0),
    };

    let listing = ListingConfig {
        featured_events_limit: load_number_config(
            &lookup,
            "FEATURED_EVENTS_LIMIT",
            "an integer number",
        )?
        .unwrap_or(3),
        home_venues_limit: load_number_config(&lookup, "HOME_VENUES_LIMIT", "an integer number")?
            .unwrap_or(3),
    };

    let event_filter = FilterSpec {
        search: lookup("FILTER_SEARCH").unwrap_or_default(),
        categories: load_list_config(&lookup, "FILTER_CATEGORIES"),
        min_price: load_number_config(&lookup, "FILTER_MIN_PRICE", "a number")?.unwrap_or(0.0),
        max_price: load_number_config(&lookup, "FILTER_MAX_PRICE", "a number")?,
    };

    Ok(Config {
        backend,
        listing,
        event_filter,
        venue_search: lookup("VENUE_SEARCH").unwrap_or_default(),
    })
}

fn load_required_config<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn load_number_config<F, N>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<N>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    N: FromStr,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, expected }),
        _ => Ok(None),
    }
}

fn load_list_config<F>(lookup: &F, name: &str) -> BTreeSet<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
