use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://192.168.1.100:8080";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("address is empty")]
    Empty,
    #[error("invalid address {address}: {reason}")]
    Invalid { address: String, reason: String },
}

/// Normalize a user-entered device address into a base URL.
///
/// A missing scheme is filled in with `http://` and trailing slashes are
/// dropped, so `{endpoint}/files` is always well formed. Applying this to its
/// own output returns the same string.
pub fn normalize_endpoint(raw: &str) -> Result<String, EndpointError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::Empty);
    }

    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    let parsed = url::Url::parse(&normalized).map_err(|err| EndpointError::Invalid {
        address: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if parsed.host_str().is_none() {
        return Err(EndpointError::Invalid {
            address: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(normalized)
}

fn has_http_scheme(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
