///! Read-only view model for the departures board
///!
///! Times are rendered in the selected airport's local zone.
use chrono::{DateTime, Utc};
use ctrl_tower_common::time::{current_local_time, to_local_clock};
use ctrl_tower_common::{Flight, FlightStatus};

use super::controller::{BoardController, BoardPhase};

const EMPTY_CELL: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIndicator {
    /// One-based page number
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBanner {
    /// First load, nothing to show yet
    Loading,
    Error(String),
    /// Fetch succeeded with no departures
    Empty,
}

/// One board row, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    pub time: String,
    pub flight: String,
    pub airline: String,
    pub destination: String,
    pub gate: String,
    pub terminal: String,
    pub status: FlightStatus,
    pub status_label: String,
    /// Estimate and delay annotation, empty when on time
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub title: String,
    pub current_time: String,
    pub rows: Vec<FormattedRow>,
    pub page_indicator: Option<PageIndicator>,
    pub status_banner: Option<StatusBanner>,
    /// A fetch is in flight over data already on screen
    pub refreshing: bool,
}

impl FormattedRow {
    pub fn from_flight(flight: &Flight, airport_code: &str) -> Self {
        let status = flight.display_status();
        Self {
            time: to_local_clock(flight.scheduled_time, airport_code),
            flight: flight.flight_number.clone(),
            airline: flight.airline.clone(),
            destination: flight.destination.clone(),
            gate: cell(flight.gate.as_deref()),
            terminal: cell(flight.terminal.as_deref()),
            status,
            status_label: status.label().to_string(),
            remark: remark(flight, airport_code),
        }
    }
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or(EMPTY_CELL).to_string()
}

fn remark(flight: &Flight, airport_code: &str) -> String {
    match (flight.estimated_time, flight.delay_minutes) {
        (Some(estimated), Some(delay)) => {
            format!("EST {} +{}m", to_local_clock(estimated, airport_code), delay)
        }
        (Some(estimated), None) => format!("EST {}", to_local_clock(estimated, airport_code)),
        (None, Some(delay)) => format!("DELAYED {}m", delay),
        (None, None) => String::new(),
    }
}

impl BoardController {
    /// Snapshot of the board for rendering. Does not mutate.
    pub fn view(&self, now: DateTime<Utc>) -> BoardView {
        let (title, airport_code) = match self.airport() {
            Some(airport) if airport.has_name() => (
                format!("DEPARTURES - {} ({})", airport.code, airport.name),
                airport.code.as_str(),
            ),
            Some(airport) => (
                format!("DEPARTURES - {}", airport.code),
                airport.code.as_str(),
            ),
            None => ("DEPARTURES".to_string(), ""),
        };

        let rows = self
            .page()
            .iter()
            .map(|flight| FormattedRow::from_flight(flight, airport_code))
            .collect();

        let total = self.total_pages();
        let page_indicator = (total > 1).then(|| PageIndicator {
            current: self.current_page() + 1,
            total,
        });

        let has_data = !self.flights().is_empty();
        let status_banner = match self.phase() {
            BoardPhase::Fetching if !has_data => Some(StatusBanner::Loading),
            BoardPhase::Failed => Some(StatusBanner::Error(
                self.last_error().unwrap_or("Unknown error").to_string(),
            )),
            BoardPhase::Ready if !has_data => Some(StatusBanner::Empty),
            _ => None,
        };

        BoardView {
            title,
            current_time: current_local_time(now, airport_code),
            rows,
            page_indicator,
            status_banner,
            refreshing: self.is_fetching() && has_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TowerError;
    use crate::module::board::controller::BoardCommand;
    use crate::module::board::test_support::{flight_at, flights, outcome_err, outcome_ok};
    use chrono::TimeZone;
    use ctrl_tower_common::SelectedAirport;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 4, 19, 0, 0).unwrap()
    }

    fn sfo_board(loaded: Vec<Flight>, page_size: usize) -> BoardController {
        let mut board = BoardController::new(page_size);
        let ticket = board
            .handle(BoardCommand::SelectAirport(SelectedAirport::new(
                "SFO",
                "San Francisco International",
            )))
            .unwrap();
        board.apply(outcome_ok(ticket, loaded));
        board
    }

    #[test]
    fn test_row_times_are_airport_local() {
        let board = sfo_board(vec![flight_at("UA1", 2024, 1, 4, 19, 30)], 10);
        let view = board.view(now());

        assert_eq!(view.title, "DEPARTURES - SFO (San Francisco International)");
        assert_eq!(view.current_time, "11:00:00");
        assert_eq!(view.rows[0].time, "11:30");
        assert_eq!(view.rows[0].gate, "---");
        assert_eq!(view.rows[0].status_label, "SCHEDULED");
        assert_eq!(view.status_banner, None);
        assert_eq!(view.page_indicator, None);
    }

    #[test]
    fn test_remarks() {
        let mut delayed = flight_at("UA2", 2024, 1, 4, 19, 30);
        delayed.estimated_time = Some(Utc.with_ymd_and_hms(2024, 1, 4, 19, 45, 0).unwrap());
        delayed.delay_minutes = Some(15);
        let mut estimate_only = flight_at("UA3", 2024, 1, 4, 20, 0);
        estimate_only.estimated_time = Some(Utc.with_ymd_and_hms(2024, 1, 4, 19, 55, 0).unwrap());
        let mut delay_only = flight_at("UA4", 2024, 1, 4, 21, 0);
        delay_only.delay_minutes = Some(40);
        delay_only.status = Some(FlightStatus::Active);

        let board = sfo_board(vec![delayed, estimate_only, delay_only], 10);
        let rows = board.view(now()).rows;

        assert_eq!(rows[0].remark, "EST 11:45 +15m");
        assert_eq!(rows[1].remark, "EST 11:55");
        assert_eq!(rows[2].remark, "DELAYED 40m");
        assert_eq!(rows[2].status, FlightStatus::Active);
    }

    #[test]
    fn test_page_indicator() {
        let mut board = sfo_board(flights(12), 10);
        assert_eq!(
            board.view(now()).page_indicator,
            Some(PageIndicator { current: 1, total: 2 })
        );

        board.handle(BoardCommand::NextPage);
        let view = board.view(now());
        assert_eq!(view.page_indicator, Some(PageIndicator { current: 2, total: 2 }));
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn test_banners() {
        let mut board = BoardController::new(10);
        assert_eq!(board.view(now()).title, "DEPARTURES");

        let ticket = board
            .handle(BoardCommand::SelectAirport(SelectedAirport::from_code("XYZ")))
            .unwrap();
        let view = board.view(now());
        assert_eq!(view.title, "DEPARTURES - XYZ");
        assert_eq!(view.status_banner, Some(StatusBanner::Loading));
        assert!(!view.refreshing);

        board.apply(outcome_ok(ticket, Vec::new()));
        assert_eq!(board.view(now()).status_banner, Some(StatusBanner::Empty));

        let ticket = board.handle(BoardCommand::Refresh).unwrap();
        board.apply(outcome_err(ticket, TowerError::Network("connection reset".into())));
        assert_eq!(
            board.view(now()).status_banner,
            Some(StatusBanner::Error("Network error: connection reset".to_string()))
        );
    }

    #[test]
    fn test_refreshing_keeps_rows() {
        let mut board = sfo_board(flights(3), 10);
        board.handle(BoardCommand::Refresh).unwrap();

        let view = board.view(now());
        assert!(view.refreshing);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.status_banner, None);
    }
}
