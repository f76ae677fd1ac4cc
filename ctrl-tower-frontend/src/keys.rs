///! Key bindings
///!
///! Keys are translated into [`Action`]s here so the app loop only deals with
///! intent, and the bindings can be tested without a terminal.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ctrl_tower_backend::BoardCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Search,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Arrivals,
    Departures,
    LiveMap,
    Help,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Arrivals, Tab::Departures, Tab::LiveMap, Tab::Help];

    pub fn index(self) -> usize {
        match self {
            Tab::Arrivals => 0,
            Tab::Departures => 1,
            Tab::LiveMap => 2,
            Tab::Help => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Arrivals => "ARRIVALS",
            Tab::Departures => "DEPARTURES",
            Tab::LiveMap => "LIVE MAP",
            Tab::Help => "HELP",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Leave the title screen
    Continue,
    SearchInput(char),
    SearchBackspace,
    SearchUp,
    SearchDown,
    SearchSelect,
    /// Esc on the search screen
    SearchCancel,
    ChangeAirport,
    SwitchTab(Tab),
    Board(BoardCommand),
}

pub fn map_key(screen: Screen, tab: Tab, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match screen {
        Screen::Title => Some(Action::Continue),
        Screen::Search => map_search_key(key),
        Screen::Main => map_main_key(tab, key),
    }
}

fn map_search_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::SearchCancel),
        KeyCode::Enter => Some(Action::SearchSelect),
        KeyCode::Up => Some(Action::SearchUp),
        KeyCode::Down => Some(Action::SearchDown),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn map_main_key(tab: Tab, key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Tab => Action::SwitchTab(tab.next()),
        KeyCode::BackTab => Action::SwitchTab(tab.prev()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            Action::SwitchTab(Tab::ALL[index])
        }
        KeyCode::Char('s') | KeyCode::Char('S') => Action::ChangeAirport,
        _ if tab == Tab::Departures => return map_board_key(key),
        _ => return None,
    };
    Some(action)
}

fn map_board_key(key: KeyEvent) -> Option<Action> {
    let command = match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => BoardCommand::Refresh,
        KeyCode::Char('[') | KeyCode::Left => BoardCommand::PrevPage,
        KeyCode::Char(']') | KeyCode::Right => BoardCommand::NextPage,
        _ => return None,
    };
    Some(Action::Board(command))
}
