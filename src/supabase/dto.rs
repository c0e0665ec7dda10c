use crate::directory::filter::parse_price;
use crate::directory::model::{Event, Venue};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

// Note: text columns are nullable in the table store, hence the custom deserializers
#[derive(Debug, Deserialize)]
pub struct EventRow {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_str")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub time: String,
    pub venue_id: i64,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub image_url: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub created_at: String,
}

impl EventRow {
    pub fn to_model(self) -> Event {
        if parse_price(&self.price).is_none() {
            warn!(
                "Event {} has an unreadable price '{}' (not filtering it by price)",
                self.id, self.price
            );
        }

        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            date: self.date,
            time: self.time,
            venue_id: self.venue_id,
            price: self.price,
            image_url: self.image_url,
            featured: self.featured,
            instructor: self.instructor.filter(|instructor| !instructor.is_empty()),
            created_at: self.created_at,
        }
    }
}

/// Also decodes the `id,name` projection, leaving the other columns empty
#[derive(Debug, Deserialize)]
pub struct VenueRow {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_str")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub image_url: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub created_at: String,
}

impl VenueRow {
    pub fn to_model(self) -> Venue {
        Venue {
            id: self.id,
            name: self.name,
            address: self.address,
            description: self.description,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

/// Error body returned by the REST layer on non 2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

fn deserialize_str<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Prices are text (`$25`), but the older schema stored them as numbers.
/// Any other JSON type decodes as empty text rather than failing the whole row.
fn deserialize_price<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        unknown => {
            warn!("Found an unknown price type: {}", unknown);
            String::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_deserialize_event_with_text_price() {
        let rows = serde_json::from_str::<Vec<EventRow>>(
            r##"
              [{
                "id": 12,
                "title": "Jungle Yoga Flow",
                "description": "Experience a revitalizing vinyasa flow in the heart of the Tulum jungle.",
                "category": "yoga",
                "date": "2025-03-05",
                "time": "08:00",
                "venue_id": 3,
                "price": "$25",
                "image_url": "https://images.unsplash.com/photo-1545205597-3d9d02c29597",
                "featured": false,
                "instructor": "Carlos Mendez",
                "created_at": "2025-02-28T10:12:01.123456+00:00"
              }]"##,
        );

        assert!(rows.is_ok(), "{:?}", rows);

        let event = rows.unwrap().remove(0).to_model();

        assert_eq!(event.id, 12);
        assert_eq!(event.price, "$25");
        assert_eq!(event.venue_id, 3);
        assert_eq!(event.instructor.as_deref(), Some("Carlos Mendez"));
    }

    #[test_log::test]
    fn should_deserialize_event_with_numeric_price_and_nulls() {
        let row = serde_json::from_str::<EventRow>(
            r##"
              {
                "id": 4,
                "title": "Plant Medicine Integration Circle",
                "description": null,
                "category": "workshop",
                "date": "2025-03-14",
                "time": "19:00",
                "venue_id": 1,
                "price": 0,
                "image_url": null,
                "featured": true,
                "instructor": null,
                "created_at": "2025-02-28T10:12:01+00:00"
              }"##,
        );

        assert!(row.is_ok(), "{:?}", row);

        let event = row.unwrap().to_model();

        assert_eq!(event.price, "0");
        assert_eq!(event.description, "");
        assert_eq!(event.image_url, "");
        assert_eq!(event.instructor, None);
        assert!(event.featured);
    }

    #[test_log::test]
    fn price_of_unknown_type_should_decode_as_unreadable_text() {
        let rows = serde_json::from_str::<Vec<EventRow>>(
            r##"[
              { "id": 1, "title": "Jungle Yoga Flow", "venue_id": 1, "price": "$25" },
              { "id": 2, "title": "Retreat", "venue_id": 1, "price": [25] },
              { "id": 3, "title": "Cacao Ceremony", "venue_id": 2, "price": true }
            ]"##,
        );

        assert!(rows.is_ok(), "{:?}", rows);

        let events: Vec<Event> = rows.unwrap().into_iter().map(EventRow::to_model).collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].price, "$25");
        assert_eq!(events[1].price, "");
        assert_eq!(events[2].price, "");
        assert_eq!(parse_price(&events[2].price), None);
    }

    #[test_log::test]
    fn should_deserialize_venue_name_projection() {
        let rows =
            serde_json::from_str::<Vec<VenueRow>>(r##"[{ "id": 1, "name": "Azulik Cenote" }]"##);

        assert!(rows.is_ok(), "{:?}", rows);

        let venue = rows.unwrap().remove(0).to_model();

        assert_eq!(venue.name, "Azulik Cenote");
        assert_eq!(venue.address, "");
    }
}
