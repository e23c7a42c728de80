use crate::helpers::{mock_observations, mock_store, spawn_app, MockObservationAccess};
use axum::http::StatusCode;
use climate_api::{Climate, ErrorResponse};
use serde_json::{from_slice, json, Value};
use std::sync::Arc;

#[tokio::test]
async fn summary_from_start_runs_to_latest_date() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-24").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        from_slice::<Value>(&body).unwrap(),
        json!({
            "start": "2016-08-24",
            "end": "2017-08-23",
            "min": 76.0,
            "avg": 79.6,
            "max": 82.0
        })
    );
}

#[tokio::test]
async fn summary_accepts_natural_language_dates() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (iso_status, iso_body) = test_app.get("/api/v1.0/2016-08-24").await;
    let (status, body) = test_app.get("/api/v1.0/August%2024,%202016").await;

    assert_eq!(iso_status, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        from_slice::<Value>(&body).unwrap(),
        from_slice::<Value>(&iso_body).unwrap()
    );
}

#[tokio::test]
async fn summary_over_range_is_inclusive() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-23/2016-08-24").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        from_slice::<Value>(&body).unwrap(),
        json!({
            "start": "2016-08-23",
            "end": "2016-08-24",
            "min": 77.0,
            "avg": 79.25,
            "max": 81.0
        })
    );
}

#[tokio::test]
async fn reversed_range_matches_forward_range() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (forward_status, forward) = test_app.get("/api/v1.0/2016-08-23/2017-08-22").await;
    let (reversed_status, reversed) = test_app.get("/api/v1.0/2017-08-22/2016-08-23").await;

    assert_eq!(forward_status, StatusCode::OK);
    assert_eq!(reversed_status, StatusCode::OK);
    assert_eq!(forward, reversed);

    let summary: Value = from_slice(&forward).unwrap();
    let min = summary["min"].as_f64().unwrap();
    let avg = summary["avg"].as_f64().unwrap();
    let max = summary["max"].as_f64().unwrap();
    assert!(min <= avg && avg <= max);
}

#[tokio::test]
async fn unknown_start_date_is_not_found() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-25").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = from_slice(&body).unwrap();
    assert_eq!(error.error, "Start date not found within the database.");
}

#[tokio::test]
async fn unknown_end_date_is_not_found() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-23/2016-09-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = from_slice(&body).unwrap();
    assert_eq!(error.error, "End date not found within the database.");
}

#[tokio::test]
async fn start_is_checked_before_end() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/2015-01-01/2030-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = from_slice(&body).unwrap();
    assert_eq!(error.error, "Start date not found within the database.");
}

#[tokio::test]
async fn unparseable_dates_are_bad_requests() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/api/v1.0/not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = from_slice(&body).unwrap();
    assert!(error.error.contains("not-a-date"));

    let (status, _) = test_app.get("/api/v1.0/2016-08-23/someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_dataset_fails_to_load() {
    let mut store = MockObservationAccess::new();
    store.expect_min_date().returning(|| Ok(None));
    store.expect_max_date().returning(|| Ok(None));

    assert!(Climate::load(Arc::new(store)).await.is_err());
}

#[tokio::test]
async fn undecodable_dates_are_json_bad_requests() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    for uri in ["/api/v1.0/%FF", "/api/v1.0/2016-08-24/%FF"] {
        let (status, body) = test_app.get(uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        let error: ErrorResponse = from_slice(&body).expect("error body should be JSON");
        assert!(error.error.contains("UTF-8"), "uri: {uri}");
    }
}

#[tokio::test]
async fn two_digit_years_and_weekdays_are_understood() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (iso_status, iso_body) = test_app.get("/api/v1.0/2016-08-24").await;
    let (status, body) = test_app
        .get("/api/v1.0/Wednesday,%2024-Aug-2016/8%2F23%2F17")
        .await;

    assert_eq!(iso_status, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    let summary: Value = from_slice(&body).unwrap();
    assert_eq!(summary["start"], "2016-08-24");
    assert_eq!(summary["end"], "2017-08-23");
    assert_eq!(summary, from_slice::<Value>(&iso_body).unwrap());
}
