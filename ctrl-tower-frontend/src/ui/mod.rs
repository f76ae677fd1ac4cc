pub mod board;
pub mod search;
pub mod tabs;
pub mod theme;
pub mod title;

use chrono::Utc;
use ratatui::Frame;

use crate::app::App;
use crate::keys::Screen;

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    match app.screen() {
        Screen::Title => f.render_widget(title::TitleView, area),
        Screen::Search => f.render_widget(search::SearchView::new(app.search()), area),
        Screen::Main => {
            let view = app.board().view(Utc::now());
            tabs::render_main(f, area, app.tab(), &view);
        }
    }
}
