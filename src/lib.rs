pub mod config;
pub mod error;
pub mod state;
pub mod site;
pub mod submission;
pub mod transport;
pub mod feedback;
pub mod analytics;
pub mod controller;
pub mod scheduling;
pub mod routes;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::transport::webhook::WebhookTransport;

pub fn build_app(config: Config) -> Result<Router, String> {
    let transport = WebhookTransport::new(config.webhook_timeout, config.response_mode)
        .map_err(|e| format!("Failed to build webhook client: {e}"))?;

    for site in site::SiteId::ALL {
        match config.webhook_url(site) {
            Some(_) => tracing::info!("Webhook configured for {site}"),
            None => tracing::warn!("No webhook configured for {site}, submissions will fail"),
        }
    }

    let cors = cors_layer(&config.cors_origins)?;
    let static_dir = config.static_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        transport: Arc::new(transport),
    });

    let app = Router::new()
        .merge(routes::site_routes().layer(cors))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state);

    Ok(app)
}

/// Answers preflights and echoes the request origin when it is allowed.
/// No configured origins means any origin.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, String> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| format!("Invalid CORS origin {o}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86_400)))
}

async fn health() -> &'static str {
    "ok"
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
