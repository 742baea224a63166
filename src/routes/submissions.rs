use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analytics::{AnalyticsHooks, TrackedCall};
use crate::controller::{SharedControls, SubmissionState, SubmitError};
use crate::error::AppError;
use crate::feedback::{FeedbackBoard, FeedbackKind, FeedbackMessage};
use crate::site::SiteId;
use crate::state::SharedState;
use crate::submission::{metadata, parser};
use crate::transport::Delivery;

#[derive(Serialize)]
pub struct FeedbackBody {
    pub kind: FeedbackKind,
    pub text: String,
    pub html: String,
    pub dismiss_after_ms: Option<u64>,
    pub scroll_into_view: bool,
}

impl From<FeedbackMessage> for FeedbackBody {
    fn from(message: FeedbackMessage) -> Self {
        Self {
            html: message.render_html(),
            kind: message.kind,
            dismiss_after_ms: message.dismiss_after.map(|d| d.as_millis() as u64),
            scroll_into_view: message.scroll_into_view,
            text: message.text,
        }
    }
}

/// What the page applies after a relayed submission.
#[derive(Serialize)]
pub struct SubmissionResponse {
    pub state: SubmissionState,
    pub delivered: Option<Delivery>,
    pub feedback: Option<FeedbackBody>,
    pub reset_form: bool,
    pub submit_label: String,
    /// Hook calls for the page to replay into whichever trackers it loaded.
    pub analytics: Vec<TrackedCall>,
}

pub(crate) fn resolve_site(slug: &str) -> Result<SiteId, AppError> {
    SiteId::from_slug(slug).ok_or_else(|| AppError::NotFound(format!("Unknown site: {slug}")))
}

pub async fn submit(
    State(state): State<SharedState>,
    Path(site): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let site = resolve_site(&site)?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    let raw = parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?;
    let client = metadata::extract(&headers);

    let controls = SharedControls::new(site.profile().submit_label);
    let board = FeedbackBoard::without_timers();
    let (analytics, calls) = AnalyticsHooks::recording();

    let controller = state.controller(
        site,
        Box::new(controls.clone()),
        Arc::new(board.clone()),
        analytics,
    );

    let result = controller.handle_submit(&raw, &client).await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(SubmitError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(SubmitError::Busy) => StatusCode::CONFLICT,
        Err(SubmitError::Transport(_)) => StatusCode::BAD_GATEWAY,
    };

    let snapshot = controls.snapshot();
    let response = SubmissionResponse {
        state: controller.state(),
        delivered: result.ok(),
        feedback: board.current().map(FeedbackBody::from),
        reset_form: snapshot.resets > 0,
        submit_label: snapshot.label,
        analytics: calls.calls(),
    };

    Ok((status, Json(response)).into_response())
}
