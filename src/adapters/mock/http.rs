//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors, either every time or once in sequence.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Timeout the caller asked for
    pub timeout: Duration,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// Shorthand for a 200 response with a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse::Success(Response::new(200, value.to_string()))
    }

    /// Shorthand for a 200 response with raw bytes.
    pub fn bytes(body: impl Into<bytes::Bytes>) -> Self {
        MockResponse::Success(Response::new(200, body))
    }

    /// Shorthand for an empty response with `status`.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, bytes::Bytes::new()))
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use farmup::adapters::mock::{MockHttpClient, MockResponse};
/// use farmup::traits::HttpError;
///
/// let client = MockHttpClient::new();
/// // First attempt times out, every later attempt succeeds.
/// client.push_response(URL, MockResponse::Error(HttpError::Timeout("10s".into())));
/// client.set_response(URL, MockResponse::json(serde_json::json!({"version": "1.1.0"})));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Responses returned every time for a URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// One-shot responses consumed before the repeating one
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned every time `url` is requested.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Queue a response returned once, in order, before the repeating one.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued.entry(url.to_string()).or_default().push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made to `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn record_request(&self, url: &str, headers: &Headers, timeout: Duration) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            timeout,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        self.record_request(url, headers, timeout);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/package.json";

    #[tokio::test]
    async fn test_repeating_response() {
        let client = MockHttpClient::new();
        client.set_response(URL, MockResponse::status(204));

        for _ in 0..3 {
            let response = client
                .get(URL, &Headers::new(), Duration::from_secs(1))
                .await
                .unwrap();
            assert_eq!(response.status, 204);
        }
        assert_eq!(client.request_count(URL), 3);
    }

    #[tokio::test]
    async fn test_queued_responses_come_first() {
        let client = MockHttpClient::new();
        client.push_response(
            URL,
            MockResponse::Error(HttpError::Timeout("slow".to_string())),
        );
        client.set_response(URL, MockResponse::status(200));

        let first = client.get(URL, &Headers::new(), Duration::from_secs(1)).await;
        assert!(matches!(first, Err(HttpError::Timeout(_))));

        let second = client.get(URL, &Headers::new(), Duration::from_secs(1)).await;
        assert_eq!(second.unwrap().status, 200);
    }

    #[tokio::test]
    async fn test_unconfigured_url_errors() {
        let client = MockHttpClient::new();
        let result = client.get(URL, &Headers::new(), Duration::from_secs(1)).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_records_headers_and_timeout() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::status(200));

        let mut headers = Headers::new();
        headers.insert("User-Agent".to_string(), "farm".to_string());
        client
            .get(URL, &headers, Duration::from_secs(10))
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers.get("User-Agent").unwrap(), "farm");
        assert_eq!(requests[0].timeout, Duration::from_secs(10));
    }
}
