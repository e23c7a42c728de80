use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use log::debug;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    climate::{Error, PrecipitationGroup},
    normalize_date, AppState, TemperatureSummary,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings of the most recent year, one `{\"YYYY-MM-DD\": [values]}` object per day in date order"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = crate::ErrorResponse)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationGroup>>, Error> {
    let groups = state.climate.precipitation().await?;
    debug!("returning {} precipitation days", groups.len());
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station identifier in the dataset", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read stations", body = crate::ErrorResponse)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    Ok(Json(state.climate.stations().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperatures of the most active station over the most recent year, keyed by date"),
        (status = INTERNAL_SERVER_ERROR, description = "No stations or failed to read observations", body = crate::ErrorResponse)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, Error> {
    let temperatures = state.climate.tobs().await?;
    debug!(
        "returning {} temperature readings for station {}",
        temperatures.observations.len(),
        temperatures.station
    );
    Ok(Json(temperatures.observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First day of the summary, e.g. 2017-01-01 or January 1, 2017"),
    ),
    responses(
        (status = OK, description = "Temperature summary from start through the last recorded day", body = TemperatureSummary),
        (status = BAD_REQUEST, description = "Start is not a recognizable date", body = crate::ErrorResponse),
        (status = NOT_FOUND, description = "No observations were recorded on the start date", body = crate::ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = crate::ErrorResponse)
    ))]
pub async fn summary_from(
    State(state): State<Arc<AppState>>,
    start: Result<Path<String>, PathRejection>,
) -> Result<Json<TemperatureSummary>, Error> {
    let Path(start) = start?;
    let start = normalize_date(&start)?;
    debug!("temperature summary requested from {}", start);
    Ok(Json(state.climate.summarize_from(start).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First day of the summary"),
         ("end" = String, Path, description = "Last day of the summary, swapped with start when earlier"),
    ),
    responses(
        (status = OK, description = "Temperature summary over the inclusive range", body = TemperatureSummary),
        (status = BAD_REQUEST, description = "Start or end is not a recognizable date", body = crate::ErrorResponse),
        (status = NOT_FOUND, description = "No observations were recorded on the start or end date", body = crate::ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = crate::ErrorResponse)
    ))]
pub async fn summary_range(
    State(state): State<Arc<AppState>>,
    dates: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<TemperatureSummary>, Error> {
    let Path((start, end)) = dates?;
    let start = normalize_date(&start)?;
    let end = normalize_date(&end)?;
    debug!("temperature summary requested from {} to {}", start, end);
    Ok(Json(state.climate.summarize_range(start, end).await?))
}
