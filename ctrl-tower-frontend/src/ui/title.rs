use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::theme;

const BANNER: [&str; 5] = [
    "  ___ _____ ___ _       _____ _____      _____ ___ ",
    " / __|_   _| _ \\ |  ___|_   _/ _ \\ \\    / / __| _ \\",
    "| (__  | | |   / |_|___| | || (_) \\ \\/\\/ /| _||   /",
    " \\___| |_| |_|_\\____|    |_| \\___/ \\_/\\_/ |___|_|_\\",
    "",
];

/// Splash shown until the first key press
pub struct TitleView;

impl Widget for TitleView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, boxed, _, hint, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(11),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let mut lines: Vec<Line> = BANNER
            .iter()
            .map(|row| Line::styled(*row, Style::default().fg(theme::PRIMARY)))
            .collect();
        lines.push(Line::styled("FLIGHT INFORMATION SYSTEM", theme::text()));
        lines.push(Line::styled(
            format!("Version {}", env!("CARGO_PKG_VERSION")),
            theme::dim(),
        ));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(theme::border()),
            )
            .render(boxed, buf);

        Paragraph::new(Line::styled("Press any key to continue...", theme::bright()))
            .alignment(Alignment::Center)
            .render(hint, buf);
    }
}
