///! Main screen: tab header, tab body, status bar
use ctrl_tower_backend::module::board::BoardView;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use super::board::BoardWidget;
use super::theme;
use crate::keys::Tab;

const HELP_LINES: [(&str, &str); 9] = [
    ("Tab / Shift+Tab", "Switch tabs"),
    ("1-4", "Jump to tab"),
    ("R", "Refresh departures"),
    ("[ / ←", "Previous page"),
    ("] / →", "Next page"),
    ("S", "Change airport"),
    ("↑ / ↓", "Move in search results"),
    ("Enter / Esc", "Select / go back"),
    ("Q", "Quit"),
];

pub fn render_main(f: &mut Frame, area: Rect, tab: Tab, view: &BoardView) {
    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
    ])
    .areas(area);

    let titles = Tab::ALL
        .iter()
        .map(|t| Line::from(format!("[{}] {}", t.index() + 1, t.label())));
    let tabs = Tabs::new(titles)
        .select(tab.index())
        .style(theme::dim())
        .highlight_style(theme::bright())
        .divider(Span::styled("│", theme::border()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border())
                .title(Line::styled(
                    format!(" Ctrl-Tower v{} ", env!("CARGO_PKG_VERSION")),
                    theme::bright(),
                ))
                .title(Line::styled(format!(" {} ", view.current_time), theme::text()).right_aligned()),
        );
    f.render_widget(tabs, header_area);

    match tab {
        Tab::Departures => f.render_widget(BoardWidget::new(view), body_area),
        Tab::Arrivals => placeholder(f, body_area, "ARRIVALS", "Arrivals are not available yet"),
        Tab::LiveMap => placeholder(f, body_area, "LIVE MAP", "Live aircraft tracking is not available yet"),
        Tab::Help => help(f, body_area),
    }

    let status = Paragraph::new(Line::from(vec![
        Span::styled("[R] Refresh  [S] Airport  [Q] Quit", theme::dim()),
        Span::styled("   API: AirLabs", theme::text()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border()),
    );
    f.render_widget(status, status_area);
}

fn placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let body = Paragraph::new(Line::styled(message, Style::default().fg(theme::TEXT_MUTED))).block(
        Block::default()
            .title(Line::styled(format!(" {} ", title), theme::bright()))
            .borders(Borders::ALL)
            .border_style(theme::border()),
    );
    f.render_widget(body, area);
}

fn help(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), theme::bright()),
                Span::styled(*description, theme::text()),
            ])
        })
        .collect();

    let body = Paragraph::new(lines).block(
        Block::default()
            .title(Line::styled(" KEYBOARD SHORTCUTS ", theme::bright()))
            .borders(Borders::ALL)
            .border_style(theme::border()),
    );
    f.render_widget(body, area);
}
