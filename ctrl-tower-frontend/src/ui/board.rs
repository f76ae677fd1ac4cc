///! Departures board widget
///!
///! Draws a `BoardView` as-is; all paging and formatting decisions were made
///! by the backend.
use ctrl_tower_backend::module::board::{BoardView, FormattedRow, StatusBanner};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use super::theme;

/// Rows of the main screen not available to flights: tab header (3),
/// status bar (3), board title (1), table borders (2), column header and
/// its margin (2), footer (1).
const CHROME_ROWS: usize = 12;

/// How many flight rows fit in a terminal `height` rows tall
pub fn board_rows_for_height(height: u16) -> usize {
    (height as usize).saturating_sub(CHROME_ROWS).max(1)
}

const HEADERS: [&str; 8] = ["TIME", "FLIGHT", "AIRLINE", "DESTINATION", "GATE", "TERM", "STATUS", "REMARK"];

pub struct BoardWidget<'a> {
    view: &'a BoardView,
}

impl<'a> BoardWidget<'a> {
    pub fn new(view: &'a BoardView) -> Self {
        Self { view }
    }
}

fn flight_row(row: &FormattedRow) -> Row<'_> {
    let remark_style = if row.remark.is_empty() {
        theme::text()
    } else {
        ratatui::style::Style::default().fg(theme::STATUS_DELAYED)
    };
    Row::new(vec![
        Cell::from(Span::styled(row.time.as_str(), theme::bright())),
        Cell::from(Span::styled(row.flight.as_str(), theme::text())),
        Cell::from(Span::styled(row.airline.as_str(), theme::text())),
        Cell::from(Span::styled(row.destination.as_str(), theme::text())),
        Cell::from(Span::styled(row.gate.as_str(), theme::text())),
        Cell::from(Span::styled(row.terminal.as_str(), theme::text())),
        Cell::from(Span::styled(row.status_label.as_str(), theme::status(row.status))),
        Cell::from(Span::styled(row.remark.as_str(), remark_style)),
    ])
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let [title_area, table_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(area);

        let [title_left, title_right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(title_area);
        Paragraph::new(Line::styled(view.title.as_str(), theme::bright())).render(title_left, buf);

        let mut clock = vec![Span::styled(view.current_time.as_str(), theme::text())];
        if view.refreshing {
            clock.insert(0, Span::styled("REFRESHING  ", theme::dim()));
        }
        Paragraph::new(Line::from(clock))
            .alignment(Alignment::Right)
            .render(title_right, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border());

        match &view.status_banner {
            Some(StatusBanner::Loading) => {
                centered_message(block, table_area, buf, "Loading departures...", theme::text())
            }
            Some(StatusBanner::Empty) => {
                centered_message(block, table_area, buf, "No departures scheduled", theme::text())
            }
            Some(StatusBanner::Error(message)) if view.rows.is_empty() => {
                centered_message(block, table_area, buf, message, theme::error())
            }
            _ => {
                let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
                    .style(theme::dim())
                    .bottom_margin(1);
                let widths = [
                    Constraint::Length(6),
                    Constraint::Length(8),
                    Constraint::Length(8),
                    Constraint::Fill(1),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(10),
                    Constraint::Length(16),
                ];
                Table::new(view.rows.iter().map(flight_row), widths)
                    .header(header)
                    .block(block)
                    .render(table_area, buf);
            }
        }

        let mut footer = Vec::new();
        if let Some(StatusBanner::Error(message)) = &view.status_banner {
            footer.push(Span::styled(format!("{}  ", message), theme::error()));
            footer.push(Span::styled("[R] Retry  ", theme::bright()));
        } else {
            footer.push(Span::styled("[R] Refresh  ", theme::dim()));
        }
        footer.push(Span::styled("[S] Change airport", theme::dim()));
        if let Some(page) = view.page_indicator {
            footer.push(Span::styled(
                format!("  [ / ] Page {}/{}", page.current, page.total),
                theme::text(),
            ));
        }
        Paragraph::new(Line::from(footer)).render(footer_area, buf);
    }
}

fn centered_message(block: Block, area: Rect, buf: &mut Buffer, message: &str, style: ratatui::style::Style) {
    let inner = block.inner(area);
    block.render(area, buf);
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    Paragraph::new(Line::styled(message, style))
        .alignment(Alignment::Center)
        .render(middle, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrl_tower_backend::module::board::PageIndicator;
    use ctrl_tower_common::FlightStatus;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn row(flight: &str) -> FormattedRow {
        FormattedRow {
            time: "11:30".to_string(),
            flight: flight.to_string(),
            airline: "UA".to_string(),
            destination: "JFK".to_string(),
            gate: "---".to_string(),
            terminal: "---".to_string(),
            status: FlightStatus::Scheduled,
            status_label: "SCHEDULED".to_string(),
            remark: String::new(),
        }
    }

    fn view() -> BoardView {
        BoardView {
            title: "DEPARTURES - SFO (San Francisco International)".to_string(),
            current_time: "11:00:00".to_string(),
            rows: vec![row("UA100"), row("UA101")],
            page_indicator: Some(PageIndicator { current: 1, total: 2 }),
            status_banner: None,
            refreshing: false,
        }
    }

    #[test]
    fn test_rows_for_height() {
        assert_eq!(board_rows_for_height(24), 12);
        assert_eq!(board_rows_for_height(12), 1);
        assert_eq!(board_rows_for_height(0), 1);
    }

    #[test]
    fn test_renders_rows_and_page_indicator() {
        let view = view();
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 12));
        BoardWidget::new(&view).render(buf.area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("DEPARTURES - SFO"));
        assert!(text.contains("UA101"));
        assert!(text.contains("Page 1/2"));
    }

    #[test]
    fn test_error_banner_keeps_rows() {
        let mut view = view();
        view.status_banner = Some(StatusBanner::Error("Network error: reset".to_string()));
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 12));
        BoardWidget::new(&view).render(buf.area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("UA100"));
        assert!(text.contains("Network error: reset"));
    }

    #[test]
    fn test_loading_banner() {
        let mut view = view();
        view.rows.clear();
        view.page_indicator = None;
        view.status_banner = Some(StatusBanner::Loading);
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 12));
        BoardWidget::new(&view).render(buf.area, &mut buf);

        assert!(buffer_text(&buf).contains("Loading departures..."));
    }
}
