use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::site::SiteProfile;

use super::metadata::ClientContext;

/// Field values as read from the form at submit time.
pub type RawFields = HashMap<String, String>;

/// A submission built from the site schema plus derived metadata.
/// Entries keep declaration order; schema fields the form did not send are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    entries: Vec<(String, Option<String>)>,
}

impl FormSubmission {
    pub fn build(
        profile: &SiteProfile,
        raw: &RawFields,
        client: &ClientContext,
        now: DateTime<Utc>,
    ) -> Self {
        let mut entries: Vec<(String, Option<String>)> = profile
            .fields
            .iter()
            .map(|name| (name.to_string(), raw.get(*name).cloned()))
            .collect();

        entries.push((
            "timestamp".to_string(),
            Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ));
        entries.push(("source".to_string(), Some(profile.source.to_string())));

        if let Some(page) = profile.page {
            entries.push(("page".to_string(), Some(page.to_string())));
        }

        if profile.include_client_context {
            entries.push(("userAgent".to_string(), Some(client.user_agent.clone())));
            entries.push(("referrer".to_string(), Some(client.referrer_or_direct())));
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Some(s) => Value::String(s.clone()),
                    None => Value::Null,
                };
                (key.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}
