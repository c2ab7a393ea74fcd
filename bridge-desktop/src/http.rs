//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Upper bound honoured for a server-provided `Retry-After`.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - Retry with exponential backoff on 429 and 5xx, honouring `Retry-After`
/// - TLS via rustls
///
/// Statuses that are not retried, and the final response once attempts are
/// exhausted, are returned as `Ok(HttpResponse)` so callers can decode the
/// server's error payload.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with a 30 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("onedrive-client-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    fn build_request(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    fn is_retryable(status: u16) -> bool {
        status == 429 || (500..600).contains(&status)
    }

    fn retry_after(response: &HttpResponse) -> Option<Duration> {
        response
            .header("Retry-After")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
    }

    async fn into_bridge_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn classify_send_error(e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout(e.to_string())
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }

    async fn execute_with_retry_internal(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                attempt,
                max_attempts,
                url = %request.url,
                "Executing HTTP request"
            );

            let delay = match self.build_request(&request).send().await {
                Ok(response) => {
                    let response = Self::into_bridge_response(response).await?;
                    if !Self::is_retryable(response.status) || attempt >= max_attempts {
                        return Ok(response);
                    }
                    warn!(
                        status = response.status,
                        attempt,
                        "HTTP request failed with retryable status"
                    );
                    Self::retry_after(&response).unwrap_or_else(|| policy.delay_for(attempt))
                }
                Err(e) => {
                    warn!(error = %e, attempt, "HTTP request failed");
                    if attempt >= max_attempts {
                        return Err(Self::classify_send_error(e));
                    }
                    policy.delay_for(attempt)
                }
            };

            debug!(delay_ms = delay.as_millis() as u64, "Retrying after delay");
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::default())
            .await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        self.execute_with_retry_internal(request, policy).await
    }

    async fn is_connected(&self) -> bool {
        self.client
            .head("https://api.onedrive.com")
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }
}
