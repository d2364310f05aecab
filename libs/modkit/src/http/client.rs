//! Traced HTTP client: wraps `reqwest::Client`, opens an `outgoing_http`
//! span per request and injects a `traceparent` header.

use crate::http::simple_otel;
use std::time::Duration;
use tracing::{Instrument, Level};

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        );
        simple_otel::inject_trace_context(req.headers_mut());

        let response = self.inner.execute(req).instrument(span.clone()).await?;

        span.record("http.status_code", response.status().as_u16());
        Ok(response)
    }

    /// Build and execute a request prepared with [`TracedClient::request`].
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.send(self.inner.get(url)).await
    }

    pub async fn delete(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.send(self.inner.delete(url)).await
    }

    /// Start a request builder on the wrapped client.
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
