use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::analytics::{AnalyticsHooks, CtaClick, TrackedCall};
use crate::error::AppError;

use super::submissions::resolve_site;

#[derive(Serialize)]
pub struct EventResponse {
    pub analytics: Vec<TrackedCall>,
}

/// Records a call-to-action click and returns the hook calls to replay.
pub async fn cta_click(
    Path(site): Path<String>,
    payload: Result<Json<CtaClick>, JsonRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let site = resolve_site(&site)?;
    let Json(click) = payload?;

    let engagement = site
        .profile()
        .engagement
        .ok_or_else(|| AppError::NotFound(format!("Site {site} does not track CTA clicks")))?;

    let (analytics, calls) = AnalyticsHooks::recording();
    analytics.track_cta(&engagement, &click);

    Ok(Json(EventResponse {
        analytics: calls.calls(),
    }))
}
