use thiserror::Error;

/// Errors raised by the pure pipeline.
///
/// Malformed *cells* never produce an error; they are skipped. Only input
/// that cannot be treated as text at all is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Errors raised while turning a sheet URL into a `Schedule`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid sheet URL: {0}")]
    InvalidUrl(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Sheet not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Proxy reported an error: {0}")]
    ProxyReported(String),

    #[error("No data found in the sheet")]
    EmptySheet,

    #[error(transparent)]
    Malformed(#[from] CoreError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl LoadError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.chars().count() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => LoadError::AccessDenied(truncated),
            404 => LoadError::NotFound(truncated),
            429 => LoadError::RateLimited,
            500..=599 => LoadError::ServerError(truncated),
            _ => LoadError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Message shown to the user in place of the raw error.
    ///
    /// Keeps the three cases the user can act on apart: the sheet was
    /// empty, the fetch failed, or the proxy script reported a problem.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::InvalidUrl(detail) => detail.clone(),
            LoadError::EmptySheet => "No data found in the sheet".to_string(),
            LoadError::ProxyReported(detail) => format!("Proxy error: {}", detail),
            LoadError::AccessDenied(_) | LoadError::NotFound(_) => {
                "Unable to fetch data. Make sure the Google Sheet is publicly accessible \
                 (Anyone with the link can view)."
                    .to_string()
            }
            LoadError::RateLimited => "Too many requests. Please wait and try again.".to_string(),
            LoadError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            LoadError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            LoadError::ServerError(_) | LoadError::InvalidResponse(_) => {
                format!("Failed to load assignments: {}", self)
            }
            LoadError::Malformed(e) => format!("Failed to read sheet data: {}", e),
        }
    }
}
