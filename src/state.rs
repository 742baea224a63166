use std::sync::Arc;

use crate::analytics::AnalyticsHooks;
use crate::config::Config;
use crate::controller::{FormControls, FormController};
use crate::feedback::FeedbackSurface;
use crate::scheduling::BookingListener;
use crate::site::SiteId;
use crate::transport::Transport;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    /// A controller for one form interaction on `site`.
    pub fn controller(
        &self,
        site: SiteId,
        controls: Box<dyn FormControls>,
        feedback: Arc<dyn FeedbackSurface>,
        analytics: AnalyticsHooks,
    ) -> FormController {
        FormController::new(site.profile(), self.transport.clone(), controls, feedback)
            .with_endpoint(self.config.webhook_url(site).map(|s| s.to_string()))
            .with_timeout(self.config.webhook_timeout)
            .with_analytics(analytics)
    }

    pub fn booking_listener(
        &self,
        site: SiteId,
        analytics: AnalyticsHooks,
    ) -> Option<BookingListener> {
        BookingListener::new(site.profile(), self.transport.clone(), analytics).map(|listener| {
            listener
                .with_endpoint(self.config.webhook_url(site).map(|s| s.to_string()))
                .with_timeout(self.config.webhook_timeout)
        })
    }
}
