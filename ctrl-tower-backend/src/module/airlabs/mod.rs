///! AirLabs integration
///!
///! - `schema`: envelope checks and lenient record decoding
///! - `mapper`: raw schedule records → `Flight`
///! - `suggest`: merging the three suggestion categories
///! - `client`: HTTP access to `/schedules`, `/suggest` and `/airports`

pub mod client;
pub mod mapper;
pub mod schema;
pub mod suggest;

pub use client::AirLabsClient;
pub use mapper::{validate_and_map, MappedSchedules};
pub use schema::AirportInfo;
pub use suggest::{merge_suggestions, MIN_QUERY_LEN};
