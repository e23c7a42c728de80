use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    climate, index_handler, precipitation, routes, stations, summary_from,
    summary_range, tobs, Climate, ObservationStore,
};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate: Arc<Climate>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::weather::api_routes::precipitation,
        routes::weather::api_routes::stations,
        routes::weather::api_routes::tobs,
        routes::weather::api_routes::summary_from,
        routes::weather::api_routes::summary_range,
    ),
    components(
        schemas(
                climate::TemperatureSummary,
                climate::ErrorResponse,
            )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only api over the Hawaii weather station observations")
    )
)]
struct ApiDoc;

/// Probes the store and resolves the dataset bounds once, before anything is served.
pub async fn build_app_state(
    remote_url: String,
    store: Arc<dyn ObservationStore>,
) -> Result<AppState, anyhow::Error> {
    store
        .health_check()
        .await
        .map_err(|e| anyhow!("observation database failed health check: {}", e))?;

    let climate = Climate::load(store)
        .await
        .map_err(|e| anyhow!("error reading dataset bounds: {}", e))?;

    Ok(AppState {
        remote_url,
        climate: Arc::new(climate),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(summary_from))
        .route("/api/v1.0/{start}/{end}", get(summary_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", method, path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(
        target: "http_response",
        "response, {} {}, code: {}, time: {}",
        method,
        path,
        response.status().as_str(),
        response_time
    );

    response
}
