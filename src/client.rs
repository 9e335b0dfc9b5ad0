//! HTTP client for the echo service and per-request timing

use crate::{
    error::{AppError, Result},
    models::RequestRecord,
    types::Target,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Request body accepted by `POST /reverse`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseRequest {
    pub text: String,
}

/// Response body returned by `POST /reverse`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub reversed: String,
}

/// Echo service client abstraction, so the driver can be exercised without
/// a network
#[async_trait]
pub trait EchoClient: Send + Sync {
    /// Send `text` and return the service's reversal of it.
    ///
    /// Fails on connection errors, timeouts, non-2xx statuses and bodies
    /// that are not the expected JSON.
    async fn reverse(&self, text: &str) -> Result<String>;

    /// Endpoint this client talks to
    fn endpoint(&self) -> &str;
}

/// Client options for one target
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Idle connections kept per host; open connections are bounded by the
    /// driver's concurrency limit, not here
    pub max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            max_idle_per_host: crate::defaults::DEFAULT_CONCURRENCY,
            user_agent: format!("{}/{}", crate::PKG_NAME, crate::VERSION),
        }
    }
}

/// reqwest-backed client bound to a single target URL.
///
/// Each target gets its own instance, which owns its own connection pool;
/// dropping it closes the pooled connections.
#[derive(Debug, Clone)]
pub struct ReverseClient {
    client: Client,
    url: Url,
    endpoint: String,
}

impl ReverseClient {
    /// Create a client for `url`
    pub fn new(url: &str, options: &ClientOptions) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::config(format!("Invalid echo service URL '{}': {}", url, e)))?;

        let client = Client::builder()
            .timeout(options.timeout)
            .pool_max_idle_per_host(options.max_idle_per_host)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: parsed,
            endpoint: url.to_string(),
        })
    }

    /// Create a client sized for a given concurrency level
    pub fn for_target(target: Target, url: &str, timeout: Duration, concurrency: usize) -> Result<Self> {
        let options = ClientOptions {
            timeout,
            max_idle_per_host: concurrency,
            user_agent: format!("{}/{} ({})", crate::PKG_NAME, crate::VERSION, target.label()),
        };
        Self::new(url, &options)
    }
}

#[async_trait]
impl EchoClient for ReverseClient {
    async fn reverse(&self, text: &str) -> Result<String> {
        let body = ReverseRequest { text: text.to_string() };

        let response = self.client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let decoded: ReverseResponse = response.json().await?;
        Ok(decoded.reversed)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Send one request and time it.
///
/// Any failure becomes a failed record; nothing is retried.
pub async fn timed_reverse<C>(client: &C, index: usize, payload: &str) -> RequestRecord
where
    C: EchoClient + ?Sized,
{
    let issued_at = Utc::now();
    let start = Instant::now();

    match client.reverse(payload).await {
        Ok(reversed) => RequestRecord::success(index, payload.to_string(), issued_at, start.elapsed(), reversed),
        Err(e) => RequestRecord::failed(index, payload.to_string(), issued_at, e.to_string()),
    }
}
