//! Thin HTTP client for the platform's REST API.
//!
//! Wraps `reqwest` so the admin clients only deal with:
//! - a pre-configured base URL + bearer token
//! - a buffered [`Response`] that can be inspected after the connection is gone
//! - [`AdminApiError`] mapping, including the server's problem-details message

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::config::BusinessConfig;
use crate::error::{AdminApiError, ApiResult};

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Error body returned by the platform (RFC 7807 plus a legacy `error` field).
#[derive(Debug, Default, Deserialize)]
struct ProblemDetails {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
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

    /// Deserialize the body, naming the expected type in the error.
    pub fn json<T: serde::de::DeserializeOwned>(&self, what: &'static str) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| AdminApiError::Decode {
            what,
            message: e.to_string(),
        })
    }

    /// Turn a non-2xx response into an [`AdminApiError::Server`].
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let problem: ProblemDetails = serde_json::from_slice(&self.body).unwrap_or_default();
        Err(AdminApiError::server(
            self.status,
            problem.detail.or(problem.error),
        ))
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug)]
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(client: reqwest::Client, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach `Authorization: Bearer <token>` when a token is present.
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("authorization", format!("Bearer {token}")),
            None => self,
        }
    }

    /// Append one query parameter. Repeated names are kept (`accounts=a&accounts=b`).
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when the value is present.
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> ApiResult<Self> {
        let json_bytes =
            serde_json::to_vec(value).map_err(|e| AdminApiError::Encode(e.to_string()))?;
        self.body = Some(json_bytes);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Send the request and buffer the response.
    pub async fn send(self) -> ApiResult<Response> {
        debug!("{:?} {} query={:?}", self.method, self.url, self.query);

        let mut request = self
            .client
            .request(self.method.as_reqwest(), &self.url)
            .query(&self.query);

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdminApiError::Transport(e.to_string()))?;

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
            .map_err(|e| AdminApiError::Transport(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    /// Send and fail on non-2xx statuses.
    pub async fn send_ok(self) -> ApiResult<Response> {
        self.send().await?.error_for_status()
    }
}

/// REST client bound to one instance and one operator token.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(config: &BusinessConfig) -> ApiResult<Self> {
        if config.api_base_url.trim().is_empty() {
            return Err(AdminApiError::Config("missing api base url".to_owned()));
        }

        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AdminApiError::Config(e.to_string()))?;

        Ok(Self {
            inner,
            api_url: config.api_url().as_str().to_owned(),
            token: config.access_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        RequestBuilder::new(self.inner.clone(), method, url).bearer(self.token.as_deref())
    }

    /// Create a GET request relative to `/api/v1`.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::Get, path)
    }

    /// Create a POST request relative to `/api/v1`.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::Post, path)
    }

    /// Create a PUT request relative to `/api/v1`.
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::Put, path)
    }

    /// Create a DELETE request relative to `/api/v1`.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::Delete, path)
    }
}
