///! Data acquisition and board state for the departures dashboard
///!
///! The crate does no rendering. The frontend sends commands to
///! `BoardSession` / `SearchSession` and draws the view models they return.
pub mod config;
pub mod error;
pub mod module;

pub use config::TowerConfig;
pub use error::TowerError;
pub use module::airlabs::AirLabsClient;
pub use module::board::{BoardCommand, BoardSession, BoardView};
pub use module::search::SearchSession;
