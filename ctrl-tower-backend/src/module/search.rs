///! Debounced airport search
///!
///! The query is sent 500ms after the last keystroke. Each query change bumps
///! a generation and only results for the current generation are kept, so a
///! slow answer for "Sa" can never overwrite the list for "San".
use ctrl_tower_common::AirportSuggestion;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::error::TowerError;
use crate::module::airlabs::suggest::searchable_query;
use crate::module::source::SuggestionSource;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

struct SearchOutcome {
    generation: u64,
    query: String,
    result: Result<Vec<AirportSuggestion>, TowerError>,
}

pub struct SearchSession {
    source: Arc<dyn SuggestionSource>,
    query: String,
    generation: u64,
    /// When the pending query should be sent
    deadline: Option<Instant>,
    debounce: Duration,
    results: Vec<AirportSuggestion>,
    selected: usize,
    searching: bool,
    last_error: Option<String>,
    outcome_tx: mpsc::UnboundedSender<SearchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self::with_debounce(source, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(source: Arc<dyn SuggestionSource>, debounce: Duration) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            source,
            query: String::new(),
            generation: 0,
            deadline: None,
            debounce,
            results: Vec::new(),
            selected: 0,
            searching: false,
            last_error: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[AirportSuggestion] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted suggestion, if there are any
    pub fn selected(&self) -> Option<&AirportSuggestion> {
        self.results.get(self.selected)
    }

    /// A request is in flight or waiting out the debounce
    pub fn is_searching(&self) -> bool {
        self.searching || self.deadline.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.generation += 1;
        // Results belong to the previous query; nothing is selectable until
        // the new one answers.
        self.results.clear();
        self.selected = 0;
        self.last_error = None;

        if searchable_query(&self.query).is_some() {
            self.deadline = Some(now + self.debounce);
        } else {
            self.deadline = None;
            self.searching = false;
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut query = self.query.clone();
        if query.pop().is_some() {
            self.set_query(query, now);
        }
    }

    /// Send the pending query once its debounce has elapsed.
    /// Returns whether a request was started.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.spawn_search();
                true
            }
            _ => false,
        }
    }

    fn spawn_search(&mut self) {
        self.searching = true;
        let source = self.source.clone();
        let tx = self.outcome_tx.clone();
        let generation = self.generation;
        let query = self.query.clone();

        tokio::spawn(async move {
            let result = source.search_airports(&query).await;
            let _ = tx.send(SearchOutcome {
                generation,
                query,
                result,
            });
        });
    }

    fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!("Discarding stale suggestions for '{}'", outcome.query);
            return false;
        }

        self.searching = false;
        match outcome.result {
            Ok(results) => {
                self.results = results;
                self.selected = 0;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Airport search for '{}' failed: {}", outcome.query, e);
                self.results.clear();
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Apply finished searches without waiting
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next finished search. `Some(false)` means it was stale.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + self.results.len() - 1) % self.results.len();
        }
    }
}
