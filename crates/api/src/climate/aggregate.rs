use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use time::Date;
use utoipa::ToSchema;

use super::{Climate, Error};
use crate::{
    db::{Observation, ScanFilter},
    format_date,
};

/// Temperature extremes and mean (Fahrenheit) over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TemperatureSummary {
    #[serde(serialize_with = "crate::serialize_date")]
    #[schema(value_type = String, example = "2016-08-23")]
    pub start: Date,
    #[serde(serialize_with = "crate::serialize_date")]
    #[schema(value_type = String, example = "2017-08-23")]
    pub end: Date,
    /// Lowest observed temperature, null when nothing was recorded
    pub min: Option<f64>,
    /// Mean temperature rounded to two decimals
    pub avg: Option<f64>,
    /// Highest observed temperature
    pub max: Option<f64>,
}

impl Climate {
    /// Summary of every observation on or after `start`, which must be a date
    /// the dataset actually has readings for. The end is the dataset's latest date.
    pub async fn summarize_from(&self, start: Date) -> Result<TemperatureSummary, Error> {
        let known = self.known_dates().await?;
        if !known.contains(&start) {
            return Err(Error::StartDateNotFound(start));
        }

        let end = self.bounds.latest();
        debug!("summarizing temperatures from {}", format_date(start));
        let observations = self.store.scan(ScanFilter::since(start)).await?;
        Ok(summarize_temperatures(&observations, start, end))
    }

    /// Summary over `[start, end]`. Reversed input is swapped first, then
    /// both ends must be known dates, start checked before end.
    pub async fn summarize_range(&self, start: Date, end: Date) -> Result<TemperatureSummary, Error> {
        let (start, end) = if end < start { (end, start) } else { (start, end) };

        let known = self.known_dates().await?;
        if !known.contains(&start) {
            return Err(Error::StartDateNotFound(start));
        }
        if !known.contains(&end) {
            return Err(Error::EndDateNotFound(end));
        }

        debug!(
            "summarizing temperatures from {} to {}",
            format_date(start),
            format_date(end)
        );
        let observations = self.store.scan(ScanFilter::between(start, end)).await?;
        Ok(summarize_temperatures(&observations, start, end))
    }

    async fn known_dates(&self) -> Result<HashSet<Date>, Error> {
        Ok(self.store.distinct_dates().await?.into_iter().collect())
    }
}

/// Min, rounded mean and max of the temperatures recorded within `[start, end]`.
/// Rows without a temperature are ignored; with no readings left every
/// aggregate is `None`.
pub fn summarize_temperatures(
    observations: &[Observation],
    start: Date,
    end: Date,
) -> TemperatureSummary {
    let range = ScanFilter::between(start, end);
    let readings: Vec<f64> = observations
        .iter()
        .filter(|o| range.contains(o.date))
        .filter_map(|o| o.temperature)
        .filter(|t| t.is_finite())
        .collect();

    if readings.is_empty() {
        return TemperatureSummary {
            start,
            end,
            min: None,
            avg: None,
            max: None,
        };
    }

    let min = readings.iter().copied().fold(f64::INFINITY, f64::min);
    let max = readings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = readings.iter().sum::<f64>() / readings.len() as f64;

    TemperatureSummary {
        start,
        end,
        min: Some(min),
        // rounding must not push the mean outside the observed extremes
        avg: Some(round_hundredths(mean).clamp(min, max)),
        max: Some(max),
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
