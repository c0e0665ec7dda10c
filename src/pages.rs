//! Page loaders: fetch once per view, then hand plain data to the filters.

use crate::config::model::ListingConfig;
use crate::directory::filter::{build_venue_name_map, filter_events, filter_venues, venue_label};
use crate::directory::model::{Event, FilterSpec, Venue, UNKNOWN_LOCATION};
use crate::supabase::api::{APIError, SupabaseAPI, VenueProjection};
use futures::future;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

const LOADING_ERROR_TITLE: &str = "Error loading data";
const EVENT_ENTITY: &str = "Event";
const VENUE_ENTITY: &str = "Venue";

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    Failed(PageError),
}

impl<T> PageState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PageError> {
        match self {
            PageState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Events,
    Venues,
}

impl Listing {
    pub fn path(&self) -> &'static str {
        match self {
            Listing::Events => "/events",
            Listing::Venues => "/venues",
        }
    }

    pub fn browse_label(&self) -> &'static str {
        match self {
            Listing::Events => "Browse All Events",
            Listing::Venues => "Browse All Venues",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    /// `entity` is set on details pages, which show their not found view for any failure
    #[error("{message}")]
    Backend {
        message: String,
        listing: Listing,
        entity: Option<&'static str>,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str, listing: Listing },
}

impl PageError {
    fn from_api(error: APIError, listing: Listing, details_of: Option<&'static str>) -> Self {
        match error {
            APIError::NotFound { entity, .. } => PageError::NotFound {
                entity: details_of.unwrap_or(entity),
                listing,
            },
            other => PageError::Backend {
                message: other.to_string(),
                listing,
                entity: details_of,
            },
        }
    }

    /// Heading of the empty state shown instead of the page content
    pub fn empty_state_title(&self) -> String {
        match self {
            PageError::NotFound { entity, .. }
            | PageError::Backend {
                entity: Some(entity),
                ..
            } => format!("{} not found", entity),
            PageError::Backend { listing, .. } => match listing {
                Listing::Events => "No events found".to_string(),
                Listing::Venues => "No venues found".to_string(),
            },
        }
    }

    /// Where the "browse all" action of the error view leads
    pub fn back_to(&self) -> Listing {
        match self {
            PageError::Backend { listing, .. } | PageError::NotFound { listing, .. } => *listing,
        }
    }

    /// Dismissible notification, only raised for backend failures
    pub fn notification(&self) -> Option<Notification> {
        match self {
            PageError::Backend { message, .. } => Some(Notification {
                title: LOADING_ERROR_TITLE.to_string(),
                description: message.clone(),
            }),
            PageError::NotFound { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventsPage {
    pub events: Vec<Event>,
    pub venue_names: HashMap<i64, String>,
}

impl EventsPage {
    pub fn visible_events(&self, spec: &FilterSpec) -> Vec<Event> {
        filter_events(&self.events, spec)
    }

    pub fn venue_label(&self, event: &Event) -> &str {
        venue_label(&self.venue_names, event.venue_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomePage {
    pub featured_events: Vec<Event>,
    pub venues: Vec<Venue>,
    pub venue_names: HashMap<i64, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDetailsPage {
    pub event: Event,
    /// Missing when the event points at a venue that no longer exists
    pub venue: Option<Venue>,
}

impl EventDetailsPage {
    pub fn venue_label(&self) -> &str {
        self.venue
            .as_ref()
            .map(|venue| venue.name.as_str())
            .unwrap_or(UNKNOWN_LOCATION)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueDetailsPage {
    pub venue: Venue,
    pub events: Vec<Event>,
    pub venue_names: HashMap<i64, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenuesPage {
    pub venues: Vec<Venue>,
}

impl VenuesPage {
    pub fn visible_venues(&self, search: &str) -> Vec<Venue> {
        filter_venues(&self.venues, search)
    }
}

#[instrument(skip(api))]
pub async fn load_events_page(api: &SupabaseAPI) -> PageState<EventsPage> {
    let fetched = future::try_join(
        api.list_events(),
        api.list_venues(VenueProjection::IdAndName),
    )
    .await;

    match fetched {
        Ok((events, venues)) => {
            info!("Loaded {} events and {} venues", events.len(), venues.len());

            PageState::Ready(EventsPage {
                venue_names: build_venue_name_map(&venues),
                events,
            })
        }
        Err(err) => failed(err, Listing::Events, None),
    }
}

#[instrument(skip(api))]
pub async fn load_home_page(api: &SupabaseAPI, listing: &ListingConfig) -> PageState<HomePage> {
    let fetched = future::try_join(
        api.list_featured_events(listing.featured_events_limit),
        api.list_venues_by_name(Some(listing.home_venues_limit)),
    )
    .await;

    match fetched {
        Ok((featured_events, venues)) => PageState::Ready(HomePage {
            featured_events,
            venue_names: build_venue_name_map(&venues),
            venues,
        }),
        Err(err) => failed(err, Listing::Events, None),
    }
}

#[instrument(skip(api))]
pub async fn load_event_details(api: &SupabaseAPI, id: i64) -> PageState<EventDetailsPage> {
    let event = match api.get_event(id).await {
        Ok(event) => event,
        Err(err) => return failed(err, Listing::Events, Some(EVENT_ENTITY)),
    };

    match api.get_venue(event.venue_id).await {
        Ok(venue) => PageState::Ready(EventDetailsPage {
            event,
            venue: Some(venue),
        }),
        Err(APIError::NotFound { .. }) => {
            warn!("Venue {} of event {} does not exist", event.venue_id, event.id);

            PageState::Ready(EventDetailsPage { event, venue: None })
        }
        Err(err) => failed(err, Listing::Events, Some(EVENT_ENTITY)),
    }
}

#[instrument(skip(api))]
pub async fn load_venue_details(api: &SupabaseAPI, id: i64) -> PageState<VenueDetailsPage> {
    let venue = match api.get_venue(id).await {
        Ok(venue) => venue,
        Err(err) => return failed(err, Listing::Venues, Some(VENUE_ENTITY)),
    };

    match api.list_events_for_venue(venue.id).await {
        Ok(events) => PageState::Ready(VenueDetailsPage {
            venue_names: build_venue_name_map(std::slice::from_ref(&venue)),
            venue,
            events,
        }),
        Err(err) => failed(err, Listing::Venues, Some(VENUE_ENTITY)),
    }
}

#[instrument(skip(api))]
pub async fn load_venues_page(api: &SupabaseAPI) -> PageState<VenuesPage> {
    match api.list_venues_by_name(None).await {
        Ok(venues) => PageState::Ready(VenuesPage { venues }),
        Err(err) => failed(err, Listing::Venues, None),
    }
}

fn failed<T>(err: APIError, listing: Listing, details_of: Option<&'static str>) -> PageState<T> {
    error!("Failed loading page: {}", err);

    PageState::Failed(PageError::from_api(err, listing, details_of))
}
