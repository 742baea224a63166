pub mod webhook;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Whether the webhook response is inspected.
///
/// `Opaque` mirrors a no-cors browser POST: any response counts as accepted and
/// a rejecting receiver is indistinguishable from an accepting one. `Checked`
/// treats non-2xx statuses as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    #[default]
    Opaque,
    Checked,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opaque" => Ok(ResponseMode::Opaque),
            "checked" => Ok(ResponseMode::Checked),
            other => Err(format!("unknown response mode '{other}' (expected opaque or checked)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Delivery {
    /// Sent; the response was not read.
    Opaque,
    Accepted { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    NotConfigured,
    Network(String),
    TimedOut(Duration),
    Rejected { status: u16, body: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotConfigured => write!(f, "No webhook endpoint configured"),
            TransportError::Network(msg) => write!(f, "Webhook request failed: {msg}"),
            TransportError::TimedOut(after) => {
                write!(f, "Webhook request timed out after {}ms", after.as_millis())
            }
            TransportError::Rejected { status, .. } => {
                write!(f, "Webhook rejected the submission with status {status}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<Delivery, TransportError>;
}
