use axum::http::HeaderMap;

/// Browser details attached to submissions by sites that ask for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub user_agent: String,
    pub referrer: Option<String>,
}

impl ClientContext {
    pub fn referrer_or_direct(&self) -> String {
        self.referrer
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or("Direct")
            .to_string()
    }
}

/// Extract client context from request headers.
pub fn extract(headers: &HeaderMap) -> ClientContext {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let referrer = headers
        .get("referer")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string());

    ClientContext {
        user_agent,
        referrer,
    }
}
