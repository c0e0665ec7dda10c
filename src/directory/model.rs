use std::collections::BTreeSet;

pub const UNKNOWN_LOCATION: &str = "Unknown location";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Categories offered by the filter bar. Events may carry any other category.
pub const KNOWN_CATEGORIES: [&str; 5] = ["yoga", "meditation", "sound healing", "workshop", "retreat"];

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `YYYY-MM-DD`, kept as received
    pub date: String,
    pub time: String,
    pub venue_id: i64,
    /// Currency formatted text, e.g. `$25` or `0`
    pub price: String,
    pub image_url: String,
    pub featured: bool,
    pub instructor: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub created_at: String,
}

/// What the user currently wants to see on the events listing.
///
/// A default value filters nothing out.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search: String,
    /// Empty means no category restriction
    pub categories: BTreeSet<String>,
    pub min_price: f64,
    /// `None` is unbounded
    pub max_price: Option<f64>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: BTreeSet::new(),
            min_price: 0.0,
            max_price: None,
        }
    }
}

impl FilterSpec {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_category_toggled(self, category: &str) -> Self {
        let mut categories = self.categories;

        if !categories.remove(category) {
            categories.insert(category.to_string());
        }

        Self { categories, ..self }
    }

    pub fn with_price_range(self, min_price: f64, max_price: Option<f64>) -> Self {
        Self {
            min_price,
            max_price,
            ..self
        }
    }

    pub fn cleared(self) -> Self {
        Self::default()
    }

    /// Badge count shown next to the filters button. The search text is not counted.
    pub fn active_filter_count(&self) -> usize {
        let price_active = self.min_price > 0.0 || self.max_price.is_some();

        self.categories.len() + usize::from(price_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn toggling_a_category_twice_should_remove_it() {
        let spec = FilterSpec::default()
            .with_category_toggled("yoga")
            .with_category_toggled("retreat")
            .with_category_toggled("yoga");

        assert_eq!(spec.categories, BTreeSet::from(["retreat".to_string()]));
    }

    #[test_log::test]
    fn active_filter_count_should_count_categories_and_price_once() {
        let spec = FilterSpec::default()
            .with_search("cacao")
            .with_category_toggled("yoga")
            .with_category_toggled("workshop")
            .with_price_range(10.0, Some(50.0));

        assert_eq!(spec.active_filter_count(), 3);
    }

    #[test_log::test]
    fn default_spec_should_have_no_active_filters() {
        assert_eq!(FilterSpec::default().active_filter_count(), 0);
    }

    #[test_log::test]
    fn clearing_should_reset_everything() {
        let spec = FilterSpec::default()
            .with_search("moon")
            .with_category_toggled("meditation")
            .with_price_range(5.0, None)
            .cleared();

        assert_eq!(spec, FilterSpec::default());
    }
}
