use super::model::{Event, FilterSpec, Venue, UNKNOWN_LOCATION};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

lazy_static! {
    // Leading decimal number, read the way a lenient float parser would
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("Invalid number regex");
}

/// Later venues with an already seen id replace the earlier name.
pub fn build_venue_name_map(venues: &[Venue]) -> HashMap<i64, String> {
    venues
        .iter()
        .map(|venue| (venue.id, venue.name.clone()))
        .collect()
}

pub fn venue_label(venue_names: &HashMap<i64, String>, venue_id: i64) -> &str {
    venue_names
        .get(&venue_id)
        .map(String::as_str)
        .unwrap_or(UNKNOWN_LOCATION)
}

/// Keeps the events matching every clause of `spec`, in their original order.
pub fn filter_events(events: &[Event], spec: &FilterSpec) -> Vec<Event> {
    let search = spec.search.to_lowercase();

    events
        .iter()
        .filter(|event| matches_search(event, &search))
        .filter(|event| spec.categories.is_empty() || spec.categories.contains(&event.category))
        .filter(|event| matches_price(event, spec))
        .cloned()
        .collect()
}

pub fn filter_venues(venues: &[Venue], search: &str) -> Vec<Venue> {
    if search.trim().is_empty() {
        return venues.to_vec();
    }

    let search = search.to_lowercase();

    venues
        .iter()
        .filter(|venue| {
            venue.name.to_lowercase().contains(&search)
                || venue.description.to_lowercase().contains(&search)
                || venue.address.to_lowercase().contains(&search)
        })
        .cloned()
        .collect()
}

/// Reads the numeric value of a price such as `$25`, `0` or `40.50 USD`.
pub fn parse_price(price: &str) -> Option<f64> {
    let price = price.trim();
    let price = price
        .strip_prefix(CURRENCY_SYMBOLS.as_slice())
        .unwrap_or(price)
        .trim_start();

    LEADING_NUMBER
        .find(price)
        .and_then(|number| number.as_str().parse::<f64>().ok())
}

fn matches_search(event: &Event, lowercase_search: &str) -> bool {
    lowercase_search.is_empty()
        || event.title.to_lowercase().contains(lowercase_search)
        || event.description.to_lowercase().contains(lowercase_search)
}

fn matches_price(event: &Event, spec: &FilterSpec) -> bool {
    // Unreadable prices are reported once, when the row is decoded
    let Some(price) = parse_price(&event.price) else {
        return true;
    };

    if price < spec.min_price {
        return false;
    }

    spec.max_price.map_or(true, |max_price| price <= max_price)
}
