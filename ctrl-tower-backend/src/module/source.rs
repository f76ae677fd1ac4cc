use async_trait::async_trait;
use ctrl_tower_common::{AirportSuggestion, Flight};

use crate::error::TowerError;

/// Anything that can produce the departures list for an airport
#[async_trait]
pub trait DepartureSource: Send + Sync {
    async fn fetch_departures(&self, airport_code: &str) -> Result<Vec<Flight>, TowerError>;
}

/// Anything that can answer airport search queries
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn search_airports(&self, query: &str) -> Result<Vec<AirportSuggestion>, TowerError>;
}
