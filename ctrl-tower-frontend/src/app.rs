///! Terminal application loop
///!
///! One thread owns the screen state, the board session and the search
///! session. Keys are polled with a short timeout; finished fetches are
///! applied between polls.
use anyhow::Result;
use chrono::Utc;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ctrl_tower_backend::module::source::{DepartureSource, SuggestionSource};
use ctrl_tower_backend::{BoardCommand, BoardSession, SearchSession};
use ctrl_tower_common::SelectedAirport;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::keys::{Action, Screen, Tab, map_key};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct App {
    screen: Screen,
    tab: Tab,
    board: BoardSession,
    search: SearchSession,
    /// Configured page size; the viewport can only shrink it
    max_rows: usize,
    should_quit: bool,
}

impl App {
    pub fn new(
        departures: Arc<dyn DepartureSource>,
        suggestions: Arc<dyn SuggestionSource>,
        flights_per_page: usize,
        refresh_interval: Option<Duration>,
    ) -> Self {
        Self {
            screen: Screen::Title,
            tab: Tab::Departures,
            board: BoardSession::new(departures, flights_per_page, refresh_interval),
            search: SearchSession::new(suggestions),
            max_rows: flights_per_page.max(1),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn board(&self) -> &BoardSession {
        &self.board
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Skip the title and search screens and open the board for `airport`
    pub fn open_airport(&mut self, airport: SelectedAirport) {
        self.board.dispatch(BoardCommand::SelectAirport(airport));
        self.screen = Screen::Main;
        self.tab = Tab::Departures;
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Continue => self.screen = Screen::Search,
            Action::SearchInput(c) => self.search.push_char(c, now),
            Action::SearchBackspace => self.search.pop_char(now),
            Action::SearchUp => self.search.select_prev(),
            Action::SearchDown => self.search.select_next(),
            Action::SearchSelect => {
                if let Some(suggestion) = self.search.selected() {
                    let airport = SelectedAirport::from(suggestion);
                    tracing::info!("Airport selected: {} ({})", airport.code, airport.name);
                    self.open_airport(airport);
                }
            }
            Action::SearchCancel => {
                if self.board.controller().airport().is_some() {
                    self.screen = Screen::Main;
                } else {
                    self.should_quit = true;
                }
            }
            Action::ChangeAirport => {
                self.search.set_query("", now);
                self.screen = Screen::Search;
            }
            Action::SwitchTab(tab) => self.tab = tab,
            Action::Board(command) => {
                self.board.dispatch(command);
            }
        }
    }

    /// Terminal height changed
    pub fn resize(&mut self, height: u16) {
        let rows = ui::board::board_rows_for_height(height).min(self.max_rows);
        self.board.dispatch(BoardCommand::ViewportResized(rows));
    }

    /// Apply finished fetches and fire timers
    pub fn update(&mut self, now: Instant) {
        self.board.drain();
        self.board.tick(Utc::now());
        self.search.tick(now);
        self.search.drain();
    }

    /// Take over the terminal until the user quits. The terminal is
    /// restored on every exit path once raw mode is on.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        run_then_restore(|| self.run_in_alternate_screen(), restore_terminal)
    }

    fn run_in_alternate_screen(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        self.event_loop(&mut terminal)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        self.resize(terminal.size()?.height);

        while !self.should_quit() {
            terminal.draw(|f| ui::render(f, self))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Some(action) = map_key(self.screen, self.tab, key) {
                            self.handle_action(action, Instant::now());
                        }
                    }
                    Event::Resize(_, height) => self.resize(height),
                    _ => {}
                }
            }

            self.update(Instant::now());
        }

        tracing::info!("Ctrl-Tower exiting");
        Ok(())
    }
}

fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    raw?;
    screen?;
    Ok(())
}

/// Run `body`, then `restore` whether or not it failed. An error from `body`
/// takes precedence over one from `restore`.
fn run_then_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}
