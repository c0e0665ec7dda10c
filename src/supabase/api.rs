use super::dto::{ErrorBody, EventRow, VenueRow};
use crate::config::model::BackendConfig;
use crate::directory::model::{Event, Venue};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info};

const REST_PATH: &str = "rest/v1";
const EVENTS_TABLE: &str = "events";
const VENUES_TABLE: &str = "venues";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueProjection {
    Full,
    IdAndName,
}

impl VenueProjection {
    fn columns(&self) -> &'static str {
        match self {
            VenueProjection::Full => "*",
            VenueProjection::IdAndName => "id,name",
        }
    }
}

#[derive(Debug, Error)]
pub enum APIError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Received invalid response: {0}")]
    InvalidResponse(String),
}

/// Read access to the hosted `events` and `venues` tables
pub struct SupabaseAPI {
    client: ClientWithMiddleware,
    rest_url: String,
    api_key: String,
}

impl SupabaseAPI {
    pub fn new(config: &BackendConfig) -> Self {
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries),
            ))
            .build();

        Self {
            client,
            rest_url: format!("{}/{}", config.url.trim_end_matches('/'), REST_PATH),
            api_key: config.anon_key.clone(),
        }
    }

    /// Returns every event, by ascending date
    #[tracing::instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<Event>, APIError> {
        info!("Getting all events");

        self.select_events(&[("select", "*".to_string()), ("order", "date.asc".to_string())])
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_featured_events(&self, limit: u32) -> Result<Vec<Event>, APIError> {
        info!("Getting {} featured events", limit);

        self.select_events(&[
            ("select", "*".to_string()),
            ("featured", "eq.true".to_string()),
            ("order", "date.asc".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_events_for_venue(&self, venue_id: i64) -> Result<Vec<Event>, APIError> {
        self.select_events(&[
            ("select", "*".to_string()),
            ("venue_id", format!("eq.{}", venue_id)),
            ("order", "date.asc".to_string()),
        ])
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: i64) -> Result<Event, APIError> {
        self.select_events(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .await?
            .into_iter()
            .next()
            .ok_or(APIError::NotFound { entity: "Event", id })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_venues(&self, projection: VenueProjection) -> Result<Vec<Venue>, APIError> {
        info!("Getting all venues");

        self.select_venues(&[("select", projection.columns().to_string())])
            .await
    }

    /// Venues sorted by name, optionally only the first `limit`
    #[tracing::instrument(skip(self))]
    pub async fn list_venues_by_name(&self, limit: Option<u32>) -> Result<Vec<Venue>, APIError> {
        let mut query = vec![("select", "*".to_string()), ("order", "name.asc".to_string())];

        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        self.select_venues(&query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_venue(&self, id: i64) -> Result<Venue, APIError> {
        self.select_venues(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .await?
            .into_iter()
            .next()
            .ok_or(APIError::NotFound { entity: "Venue", id })
    }

    async fn select_events(&self, query: &[(&str, String)]) -> Result<Vec<Event>, APIError> {
        let rows = self.select::<EventRow>(EVENTS_TABLE, query).await?;

        Ok(rows.into_iter().map(EventRow::to_model).collect())
    }

    async fn select_venues(&self, query: &[(&str, String)]) -> Result<Vec<Venue>, APIError> {
        let rows = self.select::<VenueRow>(VENUES_TABLE, query).await?;

        Ok(rows.into_iter().map(VenueRow::to_model).collect())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, APIError> {
        let response = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| APIError::Request(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| APIError::Request(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|error_body| error_body.message)
                .unwrap_or(body);

            error!("Query on '{}' failed with {}: {}", table, status, message);

            return Err(APIError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<Vec<T>>(&body) {
            Ok(rows) => {
                debug!("Got {} rows from '{}'", rows.len(), table);
                Ok(rows)
            }
            Err(e) => {
                error!("Response parse failed: {:?}", e);
                Err(APIError::InvalidResponse(e.to_string()))
            }
        }
    }
}
