//! Request-facing queries over the observation dataset.
//!
//! [`Climate`] pairs a store handle with the [`DatasetBounds`] resolved at
//! startup. Each submodule adds the operations for one kind of query.

mod aggregate;
mod precipitation;
mod stations;

pub use aggregate::{summarize_temperatures, TemperatureSummary};
pub use precipitation::{group_precipitation, PrecipitationGroup};
pub use stations::{most_active, rank_stations, StationTemperatures};

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Date;
use utoipa::ToSchema;

use crate::{
    bounds::{self, DatasetBounds},
    db::{self, ObservationStore},
    DateError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to parse date '{0}', use a date such as YYYY-MM-DD.")]
    InvalidDateFormat(String),
    #[error("Start date not found within the database.")]
    StartDateNotFound(Date),
    #[error("End date not found within the database.")]
    EndDateNotFound(Date),
    #[error("No stations have recorded observations.")]
    NoStations,
    #[error("Failed to read observations: {0}")]
    Store(#[from] db::Error),
}

impl From<DateError> for Error {
    fn from(err: DateError) -> Self {
        match err {
            DateError::Empty => Error::InvalidDateFormat(String::new()),
            DateError::Unrecognized(raw) => Error::InvalidDateFormat(raw),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidDateFormat(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::InvalidDateFormat(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::StartDateNotFound(_) | Error::EndDateNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::NoStations | Error::Store(_) => {
                error!("error serving observations: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Internal server error."),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub struct Climate {
    store: Arc<dyn ObservationStore>,
    bounds: DatasetBounds,
}

impl Climate {
    pub fn new(store: Arc<dyn ObservationStore>, bounds: DatasetBounds) -> Self {
        Self { store, bounds }
    }

    /// Resolves the dataset bounds from the store; fails when the dataset is
    /// empty or its dates cannot be read.
    pub async fn load(store: Arc<dyn ObservationStore>) -> Result<Self, bounds::Error> {
        let bounds = DatasetBounds::load(store.as_ref()).await?;
        Ok(Self::new(store, bounds))
    }

    pub fn bounds(&self) -> DatasetBounds {
        self.bounds
    }
}
