pub mod airlabs;
pub mod board;
pub mod search;
pub mod source;
