use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::site::SiteId;
use crate::transport::ResponseMode;

/// Value shipped in the site templates before a real webhook is set up.
pub const WEBHOOK_PLACEHOLDER: &str = "YOUR_ZAPIER_WEBHOOK_URL_HERE";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub webhooks: HashMap<SiteId, String>,
    pub webhook_timeout: Duration,
    pub response_mode: ResponseMode,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("LEADFORM_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_HOST: {e}"))?;

        let port: u16 = env_or("LEADFORM_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_PORT: {e}"))?;

        let mut webhooks = HashMap::new();
        for site in SiteId::ALL {
            let key = webhook_var(site);
            if let Some(url) = webhook_url(&key, std::env::var(&key).ok())? {
                webhooks.insert(site, url);
            }
        }

        let timeout_secs: u64 = env_or("LEADFORM_WEBHOOK_TIMEOUT_SECS", "15")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_WEBHOOK_TIMEOUT_SECS: {e}"))?;
        if timeout_secs == 0 {
            return Err("Invalid LEADFORM_WEBHOOK_TIMEOUT_SECS: must be at least 1".to_string());
        }

        let response_mode: ResponseMode = env_or("LEADFORM_RESPONSE_MODE", "opaque")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_RESPONSE_MODE: {e}"))?;

        let static_dir = PathBuf::from(env_or("LEADFORM_STATIC_DIR", "static"));

        let max_body_size: usize = env_or("LEADFORM_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid LEADFORM_MAX_BODY_SIZE: {e}"))?;

        let cors_origins: Vec<String> = env_or("LEADFORM_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let log_level = env_or("LEADFORM_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            webhooks,
            webhook_timeout: Duration::from_secs(timeout_secs),
            response_mode,
            static_dir,
            max_body_size,
            cors_origins,
            log_level,
        })
    }

    pub fn webhook_url(&self, site: SiteId) -> Option<&str> {
        self.webhooks.get(&site).map(|s| s.as_str())
    }
}

fn webhook_var(site: SiteId) -> String {
    format!(
        "LEADFORM_{}_WEBHOOK_URL",
        site.slug().replace('-', "_").to_uppercase()
    )
}

/// Empty and placeholder values count as unset.
fn webhook_url(key: &str, value: Option<String>) -> Result<Option<String>, String> {
    let Some(value) = value.map(|v| v.trim().to_string()) else {
        return Ok(None);
    };
    if value.is_empty() || value == WEBHOOK_PLACEHOLDER {
        return Ok(None);
    }

    let url = reqwest::Url::parse(&value).map_err(|e| format!("Invalid {key}: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("Invalid {key}: scheme must be http or https"));
    }
    Ok(Some(value))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
