use super::model::{Event, PLACEHOLDER_IMAGE};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::warn;

const FREE_PRICES: [&str; 2] = ["0", "$0"];
const FREE_LABEL: &str = "Free";

/// Colour token used for a category badge
#[derive(strum::IntoStaticStr, strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum CategoryStyle {
    Teal,
    Leaf,
    Sunset,
    Coral,
    Ocean,
    Neutral,
}

lazy_static! {
    static ref CATEGORY_STYLES: HashMap<&'static str, CategoryStyle> = HashMap::from([
        ("yoga", CategoryStyle::Teal),
        ("meditation", CategoryStyle::Leaf),
        ("sound healing", CategoryStyle::Sunset),
        ("workshop", CategoryStyle::Coral),
        ("retreat", CategoryStyle::Ocean),
    ]);
}

pub fn category_style(category: &str) -> CategoryStyle {
    CATEGORY_STYLES
        .get(category)
        .copied()
        .unwrap_or(CategoryStyle::Neutral)
}

/// `2025-03-05` becomes `March 5, 2025`. Anything unreadable is returned as is.
pub fn format_event_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(err) => {
            warn!("Failed to format date '{}'. Err: {err}", date);
            date.to_string()
        }
    }
}

pub fn is_free(price: &str) -> bool {
    FREE_PRICES.contains(&price)
}

pub fn price_label(price: &str) -> &str {
    if is_free(price) {
        FREE_LABEL
    } else {
        price
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

pub fn image_or_placeholder(image_url: &str) -> &str {
    if image_url.is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        image_url
    }
}

/// One line summary of an event card, as shown in listings
pub fn event_summary(event: &Event, venue_label: &str) -> String {
    let mut summary = format!(
        "[{}] {} ({}) - {} {} @ {}",
        event.category,
        event.title,
        price_label(&event.price),
        format_event_date(&event.date),
        event.time,
        venue_label
    );

    if let Some(instructor) = &event.instructor {
        summary.push_str(&format!(" - Instructor: {}", instructor));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn known_categories_should_have_their_own_style() {
        assert_eq!(category_style("yoga"), CategoryStyle::Teal);
        assert_eq!(category_style("sound healing"), CategoryStyle::Sunset);
        assert_eq!(category_style("retreat"), CategoryStyle::Ocean);
    }

    #[test_log::test]
    fn unknown_category_should_use_neutral_style() {
        assert_eq!(category_style("ecstatic dance"), CategoryStyle::Neutral);
        assert_eq!(category_style("Yoga"), CategoryStyle::Neutral);

        let token: &'static str = CategoryStyle::Neutral.into();
        assert_eq!(token, "neutral");
    }

    #[test_log::test]
    fn should_format_iso_date() {
        assert_eq!(format_event_date("2025-03-05"), "March 5, 2025");
        assert_eq!(format_event_date("2024-12-25"), "December 25, 2024");
    }

    #[test_log::test]
    fn unreadable_date_should_be_shown_unchanged() {
        assert_eq!(format_event_date("next full moon"), "next full moon");
        assert_eq!(format_event_date("2025-02-30"), "2025-02-30");
    }

    #[test_log::test]
    fn zero_prices_should_be_labelled_free() {
        assert_eq!(price_label("$0"), "Free");
        assert_eq!(price_label("0"), "Free");
        assert_eq!(price_label("$25"), "$25");
        assert_eq!(price_label("0.00"), "0.00");
    }

    #[test_log::test]
    fn should_truncate_long_text_on_char_boundaries() {
        assert_eq!(truncate_text("Meditação", 20), "Meditação");
        assert_eq!(truncate_text("Meditação guiada", 8), "Meditaçã...");
        assert_eq!(truncate_text("exact", 5), "exact");
    }

    #[test_log::test]
    fn empty_image_should_use_placeholder() {
        assert_eq!(image_or_placeholder(""), "/placeholder.svg");
        assert_eq!(image_or_placeholder("https://img/1.jpg"), "https://img/1.jpg");
    }
}
