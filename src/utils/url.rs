//! Endpoint validation
//!
//! The backend endpoint is posted to verbatim, so validation only trims
//! surrounding whitespace and checks the scheme.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("endpoint is empty")]
    Empty,
    #[error("endpoint must start with http:// or https:// (got {0})")]
    UnsupportedScheme(String),
    #[error("endpoint has no host: {0}")]
    MissingHost(String),
}

/// Validate and normalize a backend chat endpoint.
///
/// # Examples
///
/// ```
/// use sidechat::utils::url::normalize_endpoint;
///
/// assert_eq!(
///     normalize_endpoint("  http://localhost:8000/api/chat/ ").unwrap(),
///     "http://localhost:8000/api/chat/"
/// );
/// assert!(normalize_endpoint("ftp://example.com").is_err());
/// ```
pub fn normalize_endpoint(raw: &str) -> Result<String, EndpointError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    let rest = ["http://", "https://"]
        .iter()
        .find_map(|scheme| lower.strip_prefix(scheme))
        .ok_or_else(|| EndpointError::UnsupportedScheme(trimmed.to_string()))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(EndpointError::MissingHost(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
