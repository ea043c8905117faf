//! Thin HTTP client over `reqwest`.
//!
//! Responses are read fully into a [`Response`] holding only owned data (status,
//! lowercased headers, body bytes), so callers can inspect headers such as
//! `x-total-count` after the connection is gone and decode the body lazily.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP client error.
#[derive(Debug, Clone, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Shared HTTP client. Cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// let client = Client::new(Duration::from_secs(10))?
///     .with_default_header("authorization", "Bearer token");
///
/// let response = client.get("http://localhost:8080/api/users").send().await?;
/// if response.is_success() {
///     let users: Vec<User> = response.json()?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    default_headers: HashMap<String, String>,
}

impl Client {
    pub fn new(timeout: Duration) -> HttpResult<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(e.to_string()))?;
        Ok(Self {
            inner,
            default_headers: HashMap::new(),
        })
    }

    /// Add a header sent with every request built from this client.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::Delete, url)
    }

    fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            client: self.inner.clone(),
            method,
            url: url.into(),
            headers: self.default_headers.clone(),
            query: Vec::new(),
            body: None,
        }
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Append query parameters. Values are percent-encoded on send.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(json_bytes);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    pub async fn send(self) -> HttpResult<Response> {
        let mut request = match self.method {
            Method::Get => self.client.get(&self.url),
            Method::Post => self.client.post(&self.url),
            Method::Put => self.client.put(&self.url),
            Method::Delete => self.client.delete(&self.url),
        };

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        // Extract status and headers before consuming the response
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), v.to_owned());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_response_is_success() {
        for (status, expected) in [(200, true), (201, true), (204, true), (404, false), (500, false)]
        {
            let response = Response {
                status,
                headers: HashMap::new(),
                body: Vec::new(),
            };
            assert_eq!(response.is_success(), expected, "status {status}");
        }
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("x-total-count".to_owned(), "42".to_owned());

        let response = Response {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("x-total-count"), Some("42"));
        assert_eq!(response.header("X-Total-Count"), Some("42"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_response_json() {
        let response = Response {
            status: 200,
            headers: HashMap::new(),
            body: br#"["ROLE_ADMIN", "ROLE_USER"]"#.to_vec(),
        };

        let roles: Vec<String> = response.json().unwrap();
        assert_eq!(roles, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }

    #[test]
    fn test_default_headers_are_copied_into_requests() {
        let builder = client()
            .with_default_header("authorization", "Bearer token")
            .get("http://localhost/api/users")
            .header("accept", "application/json");

        assert_eq!(
            builder.headers.get("authorization"),
            Some(&"Bearer token".to_owned())
        );
        assert_eq!(
            builder.headers.get("accept"),
            Some(&"application/json".to_owned())
        );
        assert_eq!(builder.method, Method::Get);
    }

    #[test]
    fn test_request_builder_query() {
        let builder = client()
            .get("http://localhost/api/users")
            .query([("page", "1"), ("sort", "id,desc")]);

        assert_eq!(
            builder.query,
            vec![
                ("page".to_owned(), "1".to_owned()),
                ("sort".to_owned(), "id,desc".to_owned())
            ]
        );
    }

    #[test]
    fn test_request_builder_json() {
        #[derive(serde::Serialize)]
        struct TestBody {
            login: String,
        }

        let builder = client()
            .post("http://localhost/api/users")
            .json(&TestBody {
                login: "test".to_owned(),
            })
            .unwrap();

        assert_eq!(
            builder.headers.get("content-type"),
            Some(&"application/json".to_owned())
        );
        assert_eq!(builder.body.as_deref(), Some(br#"{"login":"test"}"#.as_slice()));
    }
}
