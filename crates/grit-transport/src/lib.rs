//! Smart-HTTP transport.
//!
//! The clone exchange is two stateless HTTP requests: a GET that advertises
//! refs and a POST that answers an upload-pack request. Both are blocking;
//! the whole client is synchronous by design.

mod http;

pub use http::HttpClient;

/// Errors from the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid repository url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Normalize a repository URL: strip a trailing slash, ensure the `.git`
/// suffix the smart-HTTP endpoints are served under.
pub fn normalize_url(url: &str) -> Result<String, TransportError> {
    let trimmed = url.trim_end_matches('/');
    if !trimmed.starts_with("https://") && !trimmed.starts_with("http://") {
        return Err(TransportError::InvalidUrl {
            url: url.to_string(),
            reason: "expected an http(s) url".into(),
        });
    }
    if trimmed.ends_with(".git") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}.git"))
    }
}
