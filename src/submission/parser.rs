use serde_json::Value;

use super::fields::RawFields;

/// Parse a request body into raw form fields based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawFields, String> {
    let ct = content_type.unwrap_or("");

    if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("multipart/form-data") {
        Err("Multipart bodies are not accepted".to_string())
    } else {
        // Try JSON first, then form-urlencoded
        parse_json(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_json(body: &[u8]) -> Result<RawFields, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    let Value::Object(obj) = value else {
        return Err("Expected a JSON object".to_string());
    };

    let mut fields = RawFields::new();
    for (key, value) in obj {
        match value {
            Value::String(s) => {
                fields.insert(key, s);
            }
            Value::Null => {}
            other => {
                fields.insert(key, other.to_string());
            }
        }
    }
    Ok(fields)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawFields, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let mut fields = RawFields::new();
    // Repeated keys keep their first value.
    for (key, value) in form_urlencoded::parse(body_str.as_bytes()) {
        fields
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    Ok(fields)
}
