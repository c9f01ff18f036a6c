/// Errors from the makerlog API access layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    ///
    /// Displays as the server's plain-text message, verbatim.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text, or a generic fallback when the body is empty.
        message: String,
    },

    /// A success response carried a body that is not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized.
    #[error("Invalid request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The configured base URL is not a usable absolute URL.
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Convenience type alias for client return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build the error for a non-success response from its status and body.
    ///
    /// The server terminates plain-text errors with a newline; trailing
    /// whitespace is dropped. An empty body becomes `HTTP error! status: <code>`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim_end();
        let message = if body.trim().is_empty() {
            format!("HTTP error! status: {status}")
        } else {
            body.to_string()
        };
        ApiError::Http { status, message }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` when the server rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
