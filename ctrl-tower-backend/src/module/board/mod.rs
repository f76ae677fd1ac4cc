pub mod controller;
pub mod pagination;
pub mod session;
pub mod view;

pub use controller::{BoardCommand, BoardController, BoardPhase, FetchOutcome, FetchTicket};
pub use pagination::{Pagination, total_pages};
pub use session::BoardSession;
pub use view::{BoardView, FormattedRow, PageIndicator, StatusBanner};
