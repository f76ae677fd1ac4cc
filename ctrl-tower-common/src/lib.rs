pub mod airports;
pub mod time;
pub mod types;

pub use types::{AirportSuggestion, Flight, FlightStatus, SelectedAirport};
