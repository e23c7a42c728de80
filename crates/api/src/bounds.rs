use log::{info, warn};
use time::{Date, Duration};

use crate::{
    db::{self, ObservationStore},
    format_date, parse_stored_date,
};

/// Length of the "most recent year" window. Fixed, not leap-year aware.
pub const ONE_YEAR: Duration = Duration::days(365);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Observation store has no measurements")]
    EmptyDataset,
    #[error("Stored {field} date is not a valid YYYY-MM-DD date: {value}")]
    InvalidStoredDate { field: &'static str, value: String },
    #[error("Earliest date {earliest} is after latest date {latest}")]
    Reversed { earliest: String, latest: String },
    #[error("Failed to read dataset bounds: {0}")]
    Store(#[from] db::Error),
}

/// Date extent of the dataset, resolved once before the server accepts traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetBounds {
    earliest: Date,
    latest: Date,
    one_year_cutoff: Date,
}

impl DatasetBounds {
    /// Builds the bounds and the 365 day cutoff. A dataset shorter than a year
    /// has its cutoff clamped to `earliest`.
    pub fn new(earliest: Date, latest: Date) -> Result<Self, Error> {
        if earliest > latest {
            return Err(Error::Reversed {
                earliest: format_date(earliest),
                latest: format_date(latest),
            });
        }

        let cutoff = latest
            .checked_sub(ONE_YEAR)
            .map_or(earliest, |cutoff| cutoff.max(earliest));

        Ok(Self {
            earliest,
            latest,
            one_year_cutoff: cutoff,
        })
    }

    pub async fn load(store: &dyn ObservationStore) -> Result<Self, Error> {
        let earliest = store.min_date().await?.ok_or(Error::EmptyDataset)?;
        let latest = store.max_date().await?.ok_or(Error::EmptyDataset)?;

        let earliest = parse_bound("earliest", &earliest)?;
        let latest = parse_bound("latest", &latest)?;
        let bounds = Self::new(earliest, latest)?;

        if bounds.one_year_cutoff == bounds.earliest && latest - earliest < ONE_YEAR {
            warn!(
                "dataset spans less than a year, recent window starts at {}",
                format_date(bounds.earliest)
            );
        }
        info!(
            "dataset bounds: {} to {}, recent window from {}",
            format_date(bounds.earliest),
            format_date(bounds.latest),
            format_date(bounds.one_year_cutoff)
        );
        Ok(bounds)
    }

    pub fn earliest(&self) -> Date {
        self.earliest
    }

    pub fn latest(&self) -> Date {
        self.latest
    }

    pub fn one_year_cutoff(&self) -> Date {
        self.one_year_cutoff
    }
}

fn parse_bound(field: &'static str, value: &str) -> Result<Date, Error> {
    parse_stored_date(value).ok_or_else(|| Error::InvalidStoredDate {
        field,
        value: value.to_owned(),
    })
}
