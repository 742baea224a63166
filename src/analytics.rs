use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::lock;
use crate::site::{Conversion, ConversionValue, Engagement};

/// Generic analytics tag: `(event name, params)`.
pub type EventHook = Arc<dyn Fn(&str, &Value) + Send + Sync>;
/// Social pixel: `(tracked event, params)`.
pub type PixelHook = Arc<dyn Fn(&str, &Value) + Send + Sync>;
/// Professional network insight tag: `(params)`.
pub type InsightHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Lead value by company size bucket.
pub fn lead_value(company_size: &str) -> u64 {
    match company_size {
        "1-10" => 5_000,
        "11-50" => 15_000,
        "51-200" => 50_000,
        "201-1000" => 150_000,
        "1000+" => 300_000,
        _ => 10_000,
    }
}

/// Optional tracking providers. Any of them may be absent.
#[derive(Clone, Default)]
pub struct AnalyticsHooks {
    pub event: Option<EventHook>,
    pub pixel: Option<PixelHook>,
    pub insight: Option<InsightHook>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    #[serde(rename = "gtag")]
    Event,
    #[serde(rename = "fbq")]
    Pixel,
    #[serde(rename = "lintrk")]
    Insight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedCall {
    pub provider: Provider,
    pub name: Option<String>,
    pub params: Value,
}

/// A click on a call-to-action button or link.
#[derive(Debug, Clone, Deserialize)]
pub struct CtaClick {
    pub label: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Shared record of hook invocations, filled by [`AnalyticsHooks::recording`].
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<TrackedCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<TrackedCall> {
        lock(&self.0).clone()
    }

    fn push(&self, call: TrackedCall) {
        lock(&self.0).push(call);
    }
}

impl AnalyticsHooks {
    pub fn none() -> Self {
        Self::default()
    }

    /// Hooks for every provider that only record what they were called with.
    pub fn recording() -> (Self, CallLog) {
        let log = CallLog::default();

        let event_log = log.clone();
        let pixel_log = log.clone();
        let insight_log = log.clone();

        let hooks = Self {
            event: Some(Arc::new(move |name: &str, params: &Value| {
                event_log.push(TrackedCall {
                    provider: Provider::Event,
                    name: Some(name.to_string()),
                    params: params.clone(),
                });
            })),
            pixel: Some(Arc::new(move |name: &str, params: &Value| {
                pixel_log.push(TrackedCall {
                    provider: Provider::Pixel,
                    name: Some(name.to_string()),
                    params: params.clone(),
                });
            })),
            insight: Some(Arc::new(move |params: &Value| {
                insight_log.push(TrackedCall {
                    provider: Provider::Insight,
                    name: None,
                    params: params.clone(),
                });
            })),
        };

        (hooks, log)
    }

    /// Emit a conversion to every available provider.
    pub fn track(&self, conversion: &Conversion, event_name: &str, data: &Value) {
        let field = |name: &str| data.get(name).cloned().unwrap_or(Value::Null);
        let label = field(conversion.label_field);

        if let Some(event) = &self.event {
            let value = match conversion.value {
                ConversionValue::Field(name) => field(name),
                ConversionValue::LeadValue(name) => {
                    json!(lead_value(data.get(name).and_then(Value::as_str).unwrap_or("")))
                }
            };
            event(
                event_name,
                &json!({
                    "event_category": conversion.category,
                    "event_label": label,
                    "value": value,
                }),
            );
        }

        if let Some(pixel) = &self.pixel {
            let mut params = Map::new();
            params.insert("content_category".to_string(), label.clone());
            if let Some(name) = conversion.pixel_content_name {
                params.insert("content_name".to_string(), json!(name));
            }
            pixel(conversion.pixel_event, &Value::Object(params));
        }

        if let (Some(insight), Some(id)) = (&self.insight, conversion.insight_conversion_id) {
            insight(&json!({ "conversion_id": id }));
        }

        tracing::info!(conversion = event_name, label = %label, "Conversion tracked");
    }

    /// Emit an engagement event for a call-to-action click. Only the generic
    /// tag receives it.
    pub fn track_cta(&self, engagement: &Engagement, click: &CtaClick) {
        let label = click.label.trim();

        if let Some(event) = &self.event {
            event(
                engagement.event_name,
                &json!({
                    "event_category": engagement.category,
                    "event_label": label,
                    "event_value": click.href,
                }),
            );
        }

        tracing::info!(engagement = engagement.event_name, label = %label, "CTA click tracked");
    }
}
