//! reqwest adapter for the comparison API

use super::error::HttpBackendError;
use super::protocol::interpret;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use stack_application::{
    AgentsResponse, AssessRequest, BestPracticesResponse, CompareRequest, CompareResponse,
    ComparisonBackend, GatewayError,
};
use stack_domain::{Agent, AssessmentResult};
use std::time::{Duration, Instant};
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`ComparisonBackend`] over HTTP/JSON
///
/// No overall request timeout is set on the client; the deadline is owned
/// by the use cases, which drop the request future on expiry.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpBackendError> {
        Self::with_connect_timeout(base_url, CONNECT_TIMEOUT)
    }

    fn with_connect_timeout(
        base_url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, HttpBackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| HttpBackendError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("intern-stack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let request = self.client.get(self.url(path));
        self.exchange(path, request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.client.post(self.url(path)).json(body);
        self.exchange(path, request).await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let start = Instant::now();
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(
            "{} -> {} ({} bytes) in {:.1}s",
            path,
            status,
            body.len(),
            start.elapsed().as_secs_f64()
        );
        interpret(status, &body)
    }
}

/// An unreachable host is a connection failure even when reqwest also
/// flags it as a (connect) timeout.
fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_decode() {
        GatewayError::InvalidResponse(e.to_string())
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl ComparisonBackend for HttpBackend {
    async fn list_agents(&self) -> Result<Vec<Agent>, GatewayError> {
        let reply: AgentsResponse = self.get("agents").await?;
        Ok(reply.agents)
    }

    async fn list_best_practices(&self) -> Result<Vec<String>, GatewayError> {
        let reply: BestPracticesResponse = self.get("best-practices").await?;
        Ok(reply.phrases)
    }

    async fn compare(&self, request: &CompareRequest) -> Result<CompareResponse, GatewayError> {
        self.post("compare", request).await
    }

    async fn assess(&self, request: &AssessRequest) -> Result<AssessmentResult, GatewayError> {
        self.post("assess", request).await
    }
}
