pub mod bounds;
pub mod climate;
mod dates;
pub mod db;
mod routes;
mod startup;
mod templates;
mod utils;

pub use bounds::DatasetBounds;
pub use climate::{
    Climate, ErrorResponse, PrecipitationGroup, StationTemperatures, TemperatureSummary,
};
pub use dates::{format_date, normalize_date, parse_stored_date, serialize_date, DateError};
pub use db::{Observation, ObservationStore, ScanFilter, SqliteStore, Station, StationCount};
pub use routes::*;
pub use startup::*;
pub use utils::*;
