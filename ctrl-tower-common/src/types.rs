use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::airports;

/// Flight status as reported by the schedules feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "landed")]
    Landed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::Active => "active",
            FlightStatus::Landed => "landed",
            FlightStatus::Cancelled => "cancelled",
        }
    }

    /// Upper-case text shown in the board's status column
    pub fn label(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "SCHEDULED",
            FlightStatus::Active => "ACTIVE",
            FlightStatus::Landed => "LANDED",
            FlightStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(FlightStatus::Scheduled),
            "active" => Ok(FlightStatus::Active),
            "landed" => Ok(FlightStatus::Landed),
            "cancelled" | "canceled" => Ok(FlightStatus::Cancelled),
            other => Err(format!("Unknown flight status: {}", other)),
        }
    }
}

/// One departure on the board.
///
/// Only built by the schedule mapper once the designator, destination code
/// and scheduled time are known to be valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// `"{designator}-{scheduled epoch seconds}"`, stable across refreshes
    pub id: String,
    /// IATA designator, e.g. "AA2421"
    pub flight_number: String,
    /// Airline IATA code, "Unknown" when the feed has none
    pub airline: String,
    /// Destination name; equals `destination_code` until a name feed exists
    pub destination: String,
    /// Destination IATA code, e.g. "JFK"
    pub destination_code: String,
    pub scheduled_time: DateTime<Utc>,
    /// Only set when the estimate differs from the schedule
    pub estimated_time: Option<DateTime<Utc>>,
    pub gate: Option<String>,
    pub terminal: Option<String>,
    /// `None` when the feed did not report a status
    pub status: Option<FlightStatus>,
    /// Positive delay in minutes; no delay data and zero delay are both `None`
    pub delay_minutes: Option<u32>,
}

impl Flight {
    /// Status used for display. Unknown statuses read as scheduled.
    pub fn display_status(&self) -> FlightStatus {
        self.status.unwrap_or(FlightStatus::Scheduled)
    }
}

/// Airport returned by the suggestion search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportSuggestion {
    pub iata_code: String,
    pub icao_code: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub country_code: String,
}

impl AirportSuggestion {
    /// e.g. "[SFO] San Francisco International"
    pub fn label(&self) -> String {
        format!("[{}] {}", self.iata_code, self.name)
    }

    /// e.g. "San Francisco, US", or just the country code
    pub fn description(&self) -> String {
        match &self.city {
            Some(city) if !self.country_code.is_empty() => {
                format!("{}, {}", city, self.country_code)
            }
            Some(city) => city.clone(),
            None => self.country_code.clone(),
        }
    }
}

/// The airport whose departures are on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAirport {
    pub code: String,
    pub name: String,
}

impl SelectedAirport {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_ascii_uppercase(),
            name: name.into(),
        }
    }

    /// Build from a bare IATA code, naming it from the built-in airport table
    /// when possible.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let name = airports::airport_name(&code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone());
        Self { code, name }
    }

    /// Whether `name` is a real name rather than the code echoed back
    pub fn has_name(&self) -> bool {
        self.name != self.code
    }
}

impl From<&AirportSuggestion> for SelectedAirport {
    fn from(suggestion: &AirportSuggestion) -> Self {
        SelectedAirport::new(suggestion.iata_code.clone(), suggestion.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_flight() -> Flight {
        Flight {
            id: "AA100-1704396600".to_string(),
            flight_number: "AA100".to_string(),
            airline: "AA".to_string(),
            destination: "JFK".to_string(),
            destination_code: "JFK".to_string(),
            scheduled_time: Utc.with_ymd_and_hms(2024, 1, 4, 19, 30, 0).unwrap(),
            estimated_time: None,
            gate: None,
            terminal: None,
            status: None,
            delay_minutes: None,
        }
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("landed".parse::<FlightStatus>(), Ok(FlightStatus::Landed));
        assert_eq!(" Active ".parse::<FlightStatus>(), Ok(FlightStatus::Active));
        assert_eq!("canceled".parse::<FlightStatus>(), Ok(FlightStatus::Cancelled));
        assert!("diverted".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&FlightStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let status: FlightStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, FlightStatus::Active);
    }

    #[test]
    fn test_unknown_status_displays_as_scheduled() {
        let mut flight = sample_flight();
        assert_eq!(flight.status, None);
        assert_eq!(flight.display_status(), FlightStatus::Scheduled);

        flight.status = Some(FlightStatus::Cancelled);
        assert_eq!(flight.display_status(), FlightStatus::Cancelled);
    }

    #[test]
    fn test_suggestion_label_and_description() {
        let mut sfo = AirportSuggestion {
            iata_code: "SFO".to_string(),
            icao_code: Some("KSFO".to_string()),
            name: "San Francisco International".to_string(),
            city: Some("San Francisco".to_string()),
            country_code: "US".to_string(),
        };
        assert_eq!(sfo.label(), "[SFO] San Francisco International");
        assert_eq!(sfo.description(), "San Francisco, US");

        sfo.city = None;
        assert_eq!(sfo.description(), "US");
    }

    #[test]
    fn test_selected_airport_from_code() {
        let sfo = SelectedAirport::from_code(" sfo ");
        assert_eq!(sfo.code, "SFO");
        assert_eq!(sfo.name, "San Francisco International");
        assert!(sfo.has_name());

        let unknown = SelectedAirport::from_code("xyz");
        assert_eq!(unknown.code, "XYZ");
        assert_eq!(unknown.name, "XYZ");
        assert!(!unknown.has_name());
    }
}
