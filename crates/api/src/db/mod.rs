pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query observation store: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date is not in YYYY-MM-DD form: {0}")]
    InvalidDate(String),
    #[error("Observation store is missing table: {0}")]
    MissingTable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Station {
    pub id: String,
}

/// One recorded reading of a station on a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station: String,
    pub date: Date,
    /// Inches of precipitation, missing when the station did not report any
    pub precipitation: Option<f64>,
    /// Observed temperature in Fahrenheit
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationCount {
    pub station: String,
    pub count: i64,
}

/// Row selection for [`ObservationStore::scan`]. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub station: Option<String>,
    /// Return rows ascending by date, keeping store order within a date
    pub ordered: bool,
}

impl ScanFilter {
    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn since(start: Date) -> Self {
        Self {
            start: Some(start),
            ..Default::default()
        }
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Read-only access to the observation dataset.
///
/// Implementations hold no per-request state; every call is an independent,
/// bounded query.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Earliest `measurement.date`, `None` when there are no observations
    async fn min_date(&self) -> Result<Option<String>, Error>;
    /// Latest `measurement.date`, `None` when there are no observations
    async fn max_date(&self) -> Result<Option<String>, Error>;
    async fn scan(&self, filter: ScanFilter) -> Result<Vec<Observation>, Error>;
    /// Observation count per station, highest first
    async fn count_by_station(&self) -> Result<Vec<StationCount>, Error>;
    async fn distinct_dates(&self) -> Result<Vec<Date>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}
