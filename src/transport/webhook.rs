use std::time::Duration;

use async_trait::async_trait;

use super::{Delivery, ResponseMode, Transport, TransportError};

pub struct WebhookTransport {
    client: reqwest::Client,
    timeout: Duration,
    mode: ResponseMode,
}

impl WebhookTransport {
    pub fn new(timeout: Duration, mode: ResponseMode) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            timeout,
            mode,
        })
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<Delivery, TransportError> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::TimedOut(self.timeout)
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        if self.mode == ResponseMode::Opaque {
            return Ok(Delivery::Opaque);
        }

        let status = resp.status();
        if status.is_success() {
            return Ok(Delivery::Accepted {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(1024)
            .collect::<String>();

        Err(TransportError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
