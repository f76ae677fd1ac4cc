///! Departures board state machine
///!
///! `Idle → Fetching → (Ready | Failed)`. Ready and Failed go back to Fetching
///! on refresh, and any phase goes to a fresh Fetching when the airport
///! changes.
///!
///! All mutation goes through [`BoardController::handle`] (user commands and
///! viewport changes) and [`BoardController::apply`] (fetch results). Neither
///! performs I/O; the caller runs the fetch named by the returned ticket.
///!
///! A failed refresh keeps the last good flights and page on screen and adds
///! the error banner.

use chrono::{DateTime, TimeDelta, Utc};
use ctrl_tower_common::{Flight, SelectedAirport};
use std::collections::HashMap;
use std::time::Duration;

use super::pagination::Pagination;
use crate::error::TowerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// No airport selected yet
    Idle,
    Fetching,
    Ready,
    Failed,
}

/// Commands from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    SelectAirport(SelectedAirport),
    Refresh,
    NextPage,
    PrevPage,
    /// Rows available for flights after a terminal resize
    ViewportResized(usize),
}

/// A fetch the controller wants run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub airport_code: String,
}

/// The result of running a [`FetchTicket`]
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Flight>, TowerError>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BoardController {
    airport: Option<SelectedAirport>,
    flights: Vec<Flight>,
    pagination: Pagination,
    phase: BoardPhase,
    last_fetched_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    /// Generation whose outcome may apply
    generation: u64,
    /// Last generation handed out
    issued: u64,
    /// Unfinished fetches by airport code, at most one per code
    in_flight: HashMap<String, u64>,
}

impl BoardController {
    pub fn new(page_size: usize) -> Self {
        Self {
            airport: None,
            flights: Vec::new(),
            pagination: Pagination::new(page_size),
            phase: BoardPhase::Idle,
            last_fetched_at: None,
            last_error: None,
            generation: 0,
            issued: 0,
            in_flight: HashMap::new(),
        }
    }

    pub fn airport(&self) -> Option<&SelectedAirport> {
        self.airport.as_ref()
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == BoardPhase::Fetching
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.flights.len())
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetched_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Flights on the current page
    pub fn page(&self) -> &[Flight] {
        &self.flights[self.pagination.range(self.flights.len())]
    }

    /// Apply a command. Returns the fetch to run, if the command needs one.
    pub fn handle(&mut self, command: BoardCommand) -> Option<FetchTicket> {
        match command {
            BoardCommand::SelectAirport(airport) => self.select_airport(airport),
            BoardCommand::Refresh => self.refresh(),
            BoardCommand::NextPage => {
                self.pagination.next(self.flights.len());
                None
            }
            BoardCommand::PrevPage => {
                self.pagination.prev();
                None
            }
            BoardCommand::ViewportResized(rows) => {
                if self.pagination.set_page_size(rows, self.flights.len()) {
                    tracing::debug!("Board page size now {}", self.pagination.page_size());
                }
                None
            }
        }
    }

    fn select_airport(&mut self, airport: SelectedAirport) -> Option<FetchTicket> {
        let same_airport = self
            .airport
            .as_ref()
            .is_some_and(|current| current.code == airport.code);

        if same_airport {
            // Re-selecting the board's own airport is just a refresh
            self.airport = Some(airport);
            return self.refresh();
        }

        tracing::info!("Board switching to {} ({})", airport.code, airport.name);
        self.airport = Some(airport);
        self.flights.clear();
        self.pagination.reset();
        self.last_fetched_at = None;
        self.last_error = None;

        // A fetch for this code from an earlier visit is still running; wait
        // for it instead of sending a second request.
        if let Some(&pending) = self.in_flight.get(&self.airport_code()) {
            tracing::debug!("Reusing in-flight fetch (generation {})", pending);
            self.generation = pending;
            self.phase = BoardPhase::Fetching;
            return None;
        }
        Some(self.start_fetch())
    }

    fn airport_code(&self) -> String {
        self.airport
            .as_ref()
            .map(|airport| airport.code.clone())
            .unwrap_or_default()
    }

    fn refresh(&mut self) -> Option<FetchTicket> {
        match self.phase {
            BoardPhase::Ready | BoardPhase::Failed => Some(self.start_fetch()),
            BoardPhase::Fetching => {
                tracing::debug!("Refresh ignored, fetch already in flight");
                None
            }
            BoardPhase::Idle => None,
        }
    }

    fn start_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.generation = self.issued;
        self.phase = BoardPhase::Fetching;
        let airport_code = self.airport_code();
        self.in_flight.insert(airport_code.clone(), self.generation);
        FetchTicket {
            generation: self.generation,
            airport_code,
        }
    }

    /// Whether a fetch for `airport_code` has been started and not applied
    pub fn has_fetch_in_flight(&self, airport_code: &str) -> bool {
        self.in_flight.contains_key(airport_code)
    }

    /// Apply a finished fetch. Returns `false` if the outcome was stale and
    /// discarded.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let code = &outcome.ticket.airport_code;
        if self.in_flight.get(code) == Some(&outcome.ticket.generation) {
            self.in_flight.remove(code);
        }

        if outcome.ticket.generation != self.generation || !self.is_fetching() {
            tracing::debug!(
                "Discarding stale departures for {} (generation {}, current {})",
                outcome.ticket.airport_code,
                outcome.ticket.generation,
                self.generation
            );
            return false;
        }

        match outcome.result {
            Ok(flights) => {
                tracing::info!(
                    "Board loaded {} departures for {}",
                    flights.len(),
                    outcome.ticket.airport_code
                );
                self.flights = flights;
                self.pagination.clamp(self.flights.len());
                self.phase = BoardPhase::Ready;
                self.last_fetched_at = Some(outcome.completed_at);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!(
                    "Departures fetch for {} failed ({}): {}",
                    outcome.ticket.airport_code,
                    e.category(),
                    e
                );
                self.phase = BoardPhase::Failed;
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Whether the auto-refresh timer should fire. Only a Ready board
    /// refreshes itself; a failed one waits for the user.
    pub fn is_refresh_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        if self.phase != BoardPhase::Ready || interval.is_zero() {
            return false;
        }
        let Ok(interval) = TimeDelta::from_std(interval) else {
            return false;
        };
        self.last_fetched_at
            .is_some_and(|fetched_at| fetched_at + interval <= now)
    }
}
