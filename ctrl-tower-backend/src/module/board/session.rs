///! Async driver for the board controller
///!
///! Each fetch ticket runs in its own tokio task and reports back over an
///! unbounded channel. The owner of the session applies outcomes on its own
///! thread, so the controller never needs a lock.
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::controller::{BoardCommand, BoardController, FetchOutcome, FetchTicket};
use super::view::BoardView;
use crate::module::source::DepartureSource;

pub struct BoardSession {
    controller: BoardController,
    source: Arc<dyn DepartureSource>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    refresh_interval: Option<Duration>,
}

impl BoardSession {
    pub fn new(
        source: Arc<dyn DepartureSource>,
        page_size: usize,
        refresh_interval: Option<Duration>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            controller: BoardController::new(page_size),
            source,
            outcome_tx,
            outcome_rx,
            refresh_interval,
        }
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    pub fn view(&self, now: DateTime<Utc>) -> BoardView {
        self.controller.view(now)
    }

    /// Apply a command and start the fetch it asks for, if any.
    /// Returns whether a fetch was started.
    pub fn dispatch(&mut self, command: BoardCommand) -> bool {
        match self.controller.handle(command) {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let source = self.source.clone();
        let tx = self.outcome_tx.clone();

        tracing::debug!(
            "Starting departures fetch for {} (generation {})",
            ticket.airport_code,
            ticket.generation
        );

        tokio::spawn(async move {
            let result = source.fetch_departures(&ticket.airport_code).await;
            let outcome = FetchOutcome {
                ticket,
                result,
                completed_at: Utc::now(),
            };
            // The receiver only goes away with the session itself
            let _ = tx.send(outcome);
        });
    }

    /// Apply every finished fetch without waiting. Returns how many outcomes
    /// changed the board.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.controller.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next finished fetch and apply it. `Some(false)` means the
    /// outcome was stale.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.controller.apply(outcome))
    }

    /// Fire the auto-refresh if it is due. Returns whether a fetch started.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(interval) = self.refresh_interval else {
            return false;
        };
        if !self.controller.is_refresh_due(now, interval) {
            return false;
        }
        tracing::info!("Auto-refreshing departures");
        self.dispatch(BoardCommand::Refresh)
    }
}
