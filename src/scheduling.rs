use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analytics::AnalyticsHooks;
use crate::site::{Booking, SiteProfile};
use crate::transport::{Transport, TransportError};

/// A cross-origin message received from the scheduling widget iframe.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetMessage {
    pub origin: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MessageOutcome {
    Ignored,
    Booked { notified: bool },
}

/// Reacts to "event scheduled" messages for sites that embed the widget.
pub struct BookingListener {
    profile: &'static SiteProfile,
    booking: Booking,
    endpoint: Option<String>,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    analytics: AnalyticsHooks,
}

impl BookingListener {
    /// `None` when the site has no scheduling widget.
    pub fn new(
        profile: &'static SiteProfile,
        transport: Arc<dyn Transport>,
        analytics: AnalyticsHooks,
    ) -> Option<Self> {
        let booking = profile.booking?;
        Some(Self {
            profile,
            booking,
            endpoint: None,
            timeout: crate::controller::DEFAULT_TIMEOUT,
            transport,
            analytics,
        })
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_booking(&self, message: &WidgetMessage) -> bool {
        message.origin == self.booking.origin
            && message.data.get("event").and_then(Value::as_str)
                == Some(self.booking.scheduled_event)
    }

    /// Track a booking and notify the webhook. Notification failures are logged only.
    pub async fn handle(&self, message: &WidgetMessage, now: DateTime<Utc>) -> MessageOutcome {
        if !self.is_booking(message) {
            return MessageOutcome::Ignored;
        }

        self.analytics.track(
            &self.profile.conversion,
            self.booking.analytics_event,
            &json!({ "source": self.booking.analytics_source }),
        );

        let Some(url) = self.endpoint.as_deref() else {
            return MessageOutcome::Booked { notified: false };
        };

        let payload = json!({
            "type": self.booking.webhook_type,
            "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "source": self.booking.webhook_source,
        });

        let result = match tokio::time::timeout(self.timeout, self.transport.post_json(url, &payload)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::TimedOut(self.timeout)),
        };

        match result {
            Ok(_) => MessageOutcome::Booked { notified: true },
            Err(e) => {
                tracing::error!(site = %self.profile.id, "Booking notification failed: {e}");
                MessageOutcome::Booked { notified: false }
            }
        }
    }
}
