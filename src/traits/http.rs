//! HTTP client trait abstraction.
//!
//! The updater only ever issues GET requests: one for the remote manifest and
//! one for the release archive. Both go through [`HttpClient`] so tests can
//! substitute a scripted client.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Turn a non-2xx response into [`HttpError::ServerError`].
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(HttpError::ServerError {
            status: self.status,
            message,
        })
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl HttpError {
    /// Short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            HttpError::ConnectionFailed(_) => "E_CONN_FAILED",
            HttpError::Timeout(_) => "E_TIMEOUT",
            HttpError::ServerError { .. } => "E_SERVER",
            HttpError::InvalidUrl(_) => "E_INVALID_URL",
            HttpError::Other(_) => "E_HTTP",
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// Every request carries its own timeout. A timeout is reported as
/// [`HttpError::Timeout`] and is retried like any other failure.
///
/// # Example
///
/// ```ignore
/// use farmup::traits::{HttpClient, Headers};
/// use std::time::Duration;
///
/// async fn fetch<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client
///         .get("https://example.com/package.json", &Headers::new(), Duration::from_secs(10))
///         .await?
///         .error_for_status()?;
///     response.text().map_err(|e| HttpError::Other(e.to_string()))
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `headers` - Request headers
    /// * `timeout` - Upper bound for the whole request, body included
    ///
    /// # Returns
    /// The response (any status) or a transport error
    async fn get(&self, url: &str, headers: &Headers, timeout: Duration)
        -> Result<Response, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = Response::new(200, Bytes::from("Hello"));
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert_eq!(response.body, Bytes::from("Hello"));
    }

    #[test]
    fn test_response_is_success() {
        assert!(Response::new(200, Bytes::new()).is_success());
        assert!(Response::new(204, Bytes::new()).is_success());
        assert!(Response::new(299, Bytes::new()).is_success());
        assert!(!Response::new(300, Bytes::new()).is_success());
        assert!(!Response::new(404, Bytes::new()).is_success());
        assert!(!Response::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Manifest {
            version: String,
        }

        let response = Response::new(200, Bytes::from(r#"{"name":"farm","version":"1.0.0"}"#));
        let data: Manifest = response.json().unwrap();
        assert_eq!(data.version, "1.0.0");
    }

    #[test]
    fn test_error_for_status_passes_success() {
        let response = Response::new(200, "ok").error_for_status().unwrap();
        assert_eq!(response.text().unwrap(), "ok");
    }

    #[test]
    fn test_error_for_status_rejects_failure() {
        let err = Response::new(503, "maintenance")
            .error_for_status()
            .unwrap_err();
        assert_eq!(
            err,
            HttpError::ServerError {
                status: 503,
                message: "maintenance".to_string()
            }
        );
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("10s".to_string()).to_string(),
            "Request timeout: 10s"
        );
        assert_eq!(
            HttpError::ServerError {
                status: 500,
                message: "Internal Error".to_string()
            }
            .to_string(),
            "Server error (500): Internal Error"
        );
    }

    #[test]
    fn test_http_error_code() {
        assert_eq!(HttpError::Timeout(String::new()).code(), "E_TIMEOUT");
        assert_eq!(
            HttpError::ServerError {
                status: 404,
                message: String::new()
            }
            .code(),
            "E_SERVER"
        );
    }
}
