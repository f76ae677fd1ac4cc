use ctrl_tower_backend::SearchSession;
use ctrl_tower_backend::module::airlabs::MIN_QUERY_LEN;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use super::theme;

/// Airport search screen
pub struct SearchView<'a> {
    session: &'a SearchSession,
}

impl<'a> SearchView<'a> {
    pub fn new(session: &'a SearchSession) -> Self {
        Self { session }
    }

    fn status_line(&self) -> Line<'a> {
        let session = self.session;
        if let Some(error) = session.last_error() {
            return Line::styled(error.to_string(), theme::error());
        }
        if session.is_searching() {
            return Line::styled("Searching...", theme::dim());
        }
        if session.query().trim().chars().count() < MIN_QUERY_LEN {
            return Line::styled(
                format!("Type at least {} characters to search", MIN_QUERY_LEN),
                theme::dim(),
            );
        }
        if session.results().is_empty() {
            return Line::styled("No airports found", theme::dim());
        }
        Line::styled(format!("{} airports", session.results().len()), theme::dim())
    }
}

impl Widget for SearchView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [input_area, status_area, list_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let input = Line::from(vec![
            Span::styled(self.session.query().to_string(), theme::bright()),
            Span::styled("_", theme::text()),
        ]);
        Paragraph::new(input)
            .block(
                Block::default()
                    .title(" SELECT AIRPORT ")
                    .title_style(theme::bright())
                    .borders(Borders::ALL)
                    .border_style(theme::border()),
            )
            .render(input_area, buf);

        Paragraph::new(self.status_line()).render(status_area, buf);

        let items: Vec<ListItem> = self
            .session
            .results()
            .iter()
            .map(|suggestion| {
                ListItem::new(Line::from(vec![
                    Span::styled(suggestion.label(), theme::text()),
                    Span::styled(format!("  {}", suggestion.description()), theme::dim()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).border_style(theme::border()))
            .highlight_style(theme::selected())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if self.session.selected().is_some() {
            state.select(Some(self.session.selected_index()));
        }
        StatefulWidget::render(list, list_area, buf, &mut state);

        Paragraph::new(Line::styled(
            "[↑/↓] Move  [Enter] Select  [Esc] Back",
            theme::dim(),
        ))
        .render(help_area, buf);
    }
}
