///! Amber flight-board palette
use ctrl_tower_common::FlightStatus;
use ratatui::style::{Color, Modifier, Style};

pub const PRIMARY: Color = Color::Rgb(0xFF, 0x8C, 0x00);
pub const TEXT: Color = Color::Rgb(0xFF, 0xA5, 0x00);
pub const TEXT_BRIGHT: Color = Color::Rgb(0xFF, 0xD7, 0x00);
pub const TEXT_DIM: Color = Color::Rgb(0x8B, 0x5A, 0x00);
pub const TEXT_MUTED: Color = Color::Rgb(0x6B, 0x44, 0x00);
pub const BORDER: Color = Color::Rgb(0xCC, 0x70, 0x00);
pub const HIGHLIGHT_BG: Color = Color::Rgb(0x1E, 0x1E, 0x1E);

pub const STATUS_DELAYED: Color = Color::Rgb(0xFF, 0x66, 0x00);
pub const ERROR: Color = Color::Rgb(0xFF, 0x45, 0x00);

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn bright() -> Style {
    Style::default().fg(TEXT_BRIGHT).add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn error() -> Style {
    Style::default().fg(ERROR)
}

pub fn selected() -> Style {
    Style::default()
        .fg(TEXT_BRIGHT)
        .bg(HIGHLIGHT_BG)
        .add_modifier(Modifier::BOLD)
}

pub fn status(status: FlightStatus) -> Style {
    let color = match status {
        FlightStatus::Scheduled => TEXT,
        FlightStatus::Active => TEXT_BRIGHT,
        FlightStatus::Landed => TEXT_DIM,
        FlightStatus::Cancelled => ERROR,
    };
    Style::default().fg(color)
}
