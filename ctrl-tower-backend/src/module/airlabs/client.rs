///! AirLabs API client
///!
///! One GET per call, bounded by the configured timeout. The client never
///! retries; retrying is the user's decision.
use async_trait::async_trait;
use ctrl_tower_common::{AirportSuggestion, Flight};
use reqwest::Client;
use std::time::Duration;

use super::mapper::validate_and_map;
use super::schema::{parse_airports, parse_suggestions, AirportInfo};
use super::suggest::{merge_suggestions, searchable_query};
use crate::config::ApiConfig;
use crate::error::TowerError;
use crate::module::source::{DepartureSource, SuggestionSource};

const USER_AGENT: &str = concat!("ctrl-tower/", env!("CARGO_PKG_VERSION"));

/// Client for the AirLabs v9 REST API
#[derive(Clone)]
pub struct AirLabsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AirLabsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, TowerError> {
        let timeout = config.request_timeout();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TowerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            timeout,
        })
    }

    fn api_key(&self) -> Result<&str, TowerError> {
        self.api_key.as_deref().ok_or_else(|| {
            TowerError::Configuration(
                "AirLabs API key not configured. Set AIRLABS_API_KEY".to_string(),
            )
        })
    }

    /// GET `{base_url}/{endpoint}?{params}&api_key=...` and return the body
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, TowerError> {
        let api_key = self.api_key()?;

        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!(
            "{}/{}?{}&api_key={}",
            self.base_url,
            endpoint,
            query,
            urlencoding::encode(api_key)
        );

        tracing::debug!("GET {}/{} {:?}", self.base_url, endpoint, params);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TowerError::from_reqwest(e.without_url(), self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("AirLabs {} returned HTTP {}", endpoint, status);
            return Err(TowerError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TowerError::from_reqwest(e.without_url(), self.timeout))?;

        Ok(body.to_vec())
    }

    /// Scheduled departures for an airport, in upstream order
    pub async fn fetch_departures(&self, airport_code: &str) -> Result<Vec<Flight>, TowerError> {
        let code = airport_code.trim().to_ascii_uppercase();
        let body = self.get("schedules", &[("dep_iata", &code)]).await?;

        let mapped = validate_and_map(&body).inspect_err(|e| {
            tracing::error!("AirLabs schedules response for {} rejected: {}", code, e);
        })?;

        tracing::debug!(
            "Fetched {} departures for {} ({} dropped)",
            mapped.flights.len(),
            code,
            mapped.rejected
        );

        Ok(mapped.flights)
    }

    /// Airport suggestions for a search query, deduplicated by code.
    /// Queries shorter than two characters return nothing without a request.
    pub async fn search_airports(&self, query: &str) -> Result<Vec<AirportSuggestion>, TowerError> {
        let Some(query) = searchable_query(query) else {
            return Ok(Vec::new());
        };

        let body = self.get("suggest", &[("search", query)]).await?;
        let suggestions = merge_suggestions(parse_suggestions(&body)?);

        tracing::debug!("Search '{}' returned {} airports", query, suggestions.len());
        Ok(suggestions)
    }

    /// Airport details by IATA code, used to name airports picked by code
    pub async fn fetch_airport(&self, airport_code: &str) -> Result<Option<AirportInfo>, TowerError> {
        let code = airport_code.trim().to_ascii_uppercase();
        let body = self.get("airports", &[("iata_code", &code)]).await?;
        parse_airports(&body)
    }
}

#[async_trait]
impl DepartureSource for AirLabsClient {
    async fn fetch_departures(&self, airport_code: &str) -> Result<Vec<Flight>, TowerError> {
        AirLabsClient::fetch_departures(self, airport_code).await
    }
}

#[async_trait]
impl SuggestionSource for AirLabsClient {
    async fn search_airports(&self, query: &str) -> Result<Vec<AirportSuggestion>, TowerError> {
        AirLabsClient::search_airports(self, query).await
    }
}
