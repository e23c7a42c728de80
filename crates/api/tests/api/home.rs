use crate::helpers::{mock_observations, mock_store, spawn_app};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use climate_api::format_date;
use hyper::{header, Method};
use std::sync::Arc;
use time::macros::date;
use tower::ServiceExt;

#[tokio::test]
async fn home_page_lists_routes_with_dataset_bounds() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    let bounds = test_app.climate.bounds();
    assert_eq!(bounds.latest(), date!(2017 - 08 - 23));
    assert_eq!(bounds.one_year_cutoff(), date!(2016 - 08 - 23));

    assert!(html.contains("Available Routes"));
    assert!(html.contains("http://127.0.0.1:5000/api/v1.0/precipitation"));
    assert!(html.contains("http://127.0.0.1:5000/api/v1.0/tobs"));
    assert!(html.contains(&format_date(bounds.earliest())));
    assert!(html.contains(&format_date(bounds.one_year_cutoff())));
}

#[tokio::test]
async fn api_docs_are_served() {
    let test_app = spawn_app(Arc::new(mock_store(mock_observations()))).await;

    let (status, body) = test_app.get("/docs").await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("/api/v1.0/precipitation"));
}
