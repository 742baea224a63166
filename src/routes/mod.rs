pub mod events;
pub mod messages;
pub mod submissions;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn site_routes() -> Router<SharedState> {
    Router::new()
        .route("/v1/sites/{site}/submissions", post(submissions::submit))
        .route("/v1/sites/{site}/messages", post(messages::receive))
        .route("/v1/sites/{site}/events", post(events::cta_click))
}
