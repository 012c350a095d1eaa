pub mod database;
pub mod service;

pub use service::{CreateStationError, StationQueryService};
