use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::analytics::{AnalyticsHooks, TrackedCall};
use crate::error::AppError;
use crate::scheduling::{MessageOutcome, WidgetMessage};
use crate::state::SharedState;

use super::submissions::resolve_site;

#[derive(Serialize)]
pub struct MessageResponse {
    #[serde(flatten)]
    pub outcome: MessageOutcome,
    pub analytics: Vec<TrackedCall>,
}

/// Receives scheduling widget messages forwarded by the page.
pub async fn receive(
    State(state): State<SharedState>,
    Path(site): Path<String>,
    payload: Result<Json<WidgetMessage>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let site = resolve_site(&site)?;
    let Json(message) = payload?;

    let (analytics, calls) = AnalyticsHooks::recording();
    let listener = state
        .booking_listener(site, analytics)
        .ok_or_else(|| AppError::NotFound(format!("Site {site} has no scheduling widget")))?;

    let outcome = listener.handle(&message, Utc::now()).await;
    if outcome == MessageOutcome::Ignored {
        tracing::debug!(site = %site, origin = %message.origin, "Ignored widget message");
    }

    Ok(Json(MessageResponse {
        outcome,
        analytics: calls.calls(),
    }))
}
