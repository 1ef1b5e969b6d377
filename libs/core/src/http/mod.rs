use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type RawRequest = Request<Bytes>;

/// Outbound HTTP collaborator. Timeouts, pooling and cancellation live behind this seam;
/// callers make exactly one attempt per `execute`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: RawRequest) -> Result<RawResponse>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`HttpClient`] backed by a pooled `reqwest::Client` with a per-request timeout.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sms-gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: RawRequest) -> Result<RawResponse> {
        let uri = request.uri().to_string();
        let request = reqwest::Request::try_from(request)
            .with_context(|| format!("invalid request for {uri}"))?;
        let response = self
            .client
            .execute(request)
            .await
            .with_context(|| format!("request to {uri} failed"))?;
        let status = response.status();
        tracing::debug!(%uri, status = status.as_u16(), "outbound request completed");
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body from {uri}"))?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
