use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Climate, Error};
use crate::{
    db::{ScanFilter, StationCount},
    format_date,
};

/// Temperature readings of one station keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTemperatures {
    pub station: String,
    pub observations: BTreeMap<String, Option<f64>>,
}

/// Orders stations by observation count, highest first. Equal counts fall back
/// to station id so the ranking does not depend on store iteration order.
pub fn rank_stations(mut counts: Vec<StationCount>) -> Vec<StationCount> {
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.station.cmp(&b.station))
    });
    counts
}

pub fn most_active(ranked: &[StationCount]) -> Result<&StationCount, Error> {
    ranked.first().ok_or(Error::NoStations)
}

impl Climate {
    pub async fn stations(&self) -> Result<Vec<String>, Error> {
        let stations = self.store.stations().await?;
        Ok(stations.into_iter().map(|s| s.id).collect())
    }

    pub async fn rank_stations(&self) -> Result<Vec<StationCount>, Error> {
        Ok(rank_stations(self.store.count_by_station().await?))
    }

    pub async fn most_active_station(&self) -> Result<String, Error> {
        let ranked = self.rank_stations().await?;
        let top = most_active(&ranked)?;
        debug!("most active station: {} ({} rows)", top.station, top.count);
        Ok(top.station.clone())
    }

    /// Temperatures of the most active station over the most recent year.
    /// A date reported twice keeps the later reading.
    pub async fn tobs(&self) -> Result<StationTemperatures, Error> {
        let station = self.most_active_station().await?;
        let filter =
            ScanFilter::between(self.bounds.one_year_cutoff(), self.bounds.latest())
                .station(station.clone())
                .ordered();

        let observations = self
            .store
            .scan(filter)
            .await?
            .into_iter()
            .map(|o| (format_date(o.date), o.temperature))
            .collect();

        Ok(StationTemperatures {
            station,
            observations,
        })
    }
}
