use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, build_app_state, db, format_date, Climate, Observation, ObservationStore, ScanFilter,
    Station, StationCount,
};
use hyper::{header, Method};
use mockall::mock;
use std::{collections::BTreeMap, sync::Arc};
use time::{macros::date, Date};
use tower::ServiceExt;

mock! {
    pub ObservationAccess {}

    #[async_trait]
    impl ObservationStore for ObservationAccess {
        async fn min_date(&self) -> Result<Option<String>, db::Error>;
        async fn max_date(&self) -> Result<Option<String>, db::Error>;
        async fn scan(&self, filter: ScanFilter) -> Result<Vec<Observation>, db::Error>;
        async fn count_by_station(&self) -> Result<Vec<StationCount>, db::Error>;
        async fn distinct_dates(&self) -> Result<Vec<Date>, db::Error>;
        async fn stations(&self) -> Result<Vec<Station>, db::Error>;
        async fn health_check(&self) -> Result<(), db::Error>;
    }
}

pub struct TestApp {
    pub app: Router,
    pub climate: Arc<Climate>,
}

pub async fn spawn_app(store: Arc<dyn ObservationStore>) -> TestApp {
    let app_state = build_app_state(String::from("http://127.0.0.1:5000"), store)
        .await
        .expect("Failed to build app state");
    let climate = app_state.climate.clone();

    TestApp {
        app: app(app_state),
        climate,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }
}

pub const STATION_TABLE: [&str; 3] = ["USC00519397", "USC00513117", "USC00519281"];

/// A small slice of the Hawaii dataset: latest day 2017-08-23, so the most
/// recent year starts 2016-08-23. USC00519281 reports most often.
pub fn mock_observations() -> Vec<Observation> {
    vec![
        observation("USC00519397", date!(2010 - 01 - 01), Some(0.08), Some(65.0)),
        observation("USC00519281", date!(2016 - 08 - 22), Some(0.4), Some(77.0)),
        observation("USC00519397", date!(2016 - 08 - 23), Some(0.0), Some(81.0)),
        observation("USC00519281", date!(2016 - 08 - 23), Some(0.15), Some(77.0)),
        observation("USC00519281", date!(2016 - 08 - 24), Some(0.05), Some(80.0)),
        observation("USC00513117", date!(2016 - 08 - 24), None, Some(79.0)),
        observation("USC00519281", date!(2017 - 08 - 22), Some(0.5), Some(76.0)),
        observation("USC00519397", date!(2017 - 08 - 23), Some(0.0), Some(81.0)),
        observation("USC00519281", date!(2017 - 08 - 23), Some(0.08), Some(82.0)),
    ]
}

pub fn observation(
    station: &str,
    date: Date,
    precipitation: Option<f64>,
    temperature: Option<f64>,
) -> Observation {
    Observation {
        station: station.to_string(),
        date,
        precipitation,
        temperature,
    }
}

/// A mock store answering every query from `observations`, which must be
/// ascending by date.
pub fn mock_store(observations: Vec<Observation>) -> MockObservationAccess {
    let mut store = MockObservationAccess::new();

    let earliest = observations.first().map(|o| format_date(o.date));
    let latest = observations.last().map(|o| format_date(o.date));
    store.expect_health_check().returning(|| Ok(()));
    store
        .expect_min_date()
        .returning(move || Ok(earliest.clone()));
    store.expect_max_date().returning(move || Ok(latest.clone()));

    let rows = observations.clone();
    store.expect_scan().returning(move |filter| {
        Ok(rows
            .iter()
            .filter(|o| filter.contains(o.date))
            .filter(|o| filter.station.as_ref().map_or(true, |s| *s == o.station))
            .cloned()
            .collect())
    });

    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for o in &observations {
        *counts.entry(o.station.clone()).or_default() += 1;
    }
    store.expect_count_by_station().returning(move || {
        Ok(counts
            .iter()
            .map(|(station, count)| StationCount {
                station: station.clone(),
                count: *count,
            })
            .collect())
    });

    let mut dates: Vec<Date> = observations.iter().map(|o| o.date).collect();
    dates.dedup();
    store
        .expect_distinct_dates()
        .returning(move || Ok(dates.clone()));

    store.expect_stations().returning(|| {
        Ok(STATION_TABLE
            .iter()
            .map(|id| Station { id: id.to_string() })
            .collect())
    });

    store
}
