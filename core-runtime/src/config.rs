//! # Client Configuration
//!
//! A `ClientConfig` carries everything the OneDrive client needs before its
//! first request: the bearer token, the API base URL, the transport and the
//! shape of the network runtime. It is built with [`ClientConfig::builder`]
//! and validated fail-fast in [`ClientConfigBuilder::build`].
//!
//! ## Required
//!
//! - `access_token` - OAuth bearer token (acquisition is the host's job)
//!
//! ## Optional (with defaults)
//!
//! - `HttpClient` - desktop default: `bridge_desktop::ReqwestHttpClient`
//!   when the `desktop-shims` feature is enabled
//! - `api_base_url` - `https://api.onedrive.com/v1.0`
//! - `network_threads` - worker threads of the network runtime (4)
//! - `request_timeout` - per request timeout handed to the transport (30 s)
//! - `runtime_handle` - share an existing Tokio runtime instead of
//!   starting a dedicated one
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .access_token(token)
//!     .network_threads(2)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Default OneDrive personal API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.onedrive.com/v1.0";

const DEFAULT_NETWORK_THREADS: usize = 4;
const MAX_NETWORK_THREADS: usize = 64;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a OneDrive client session.
#[derive(Clone)]
pub struct ClientConfig {
    /// OAuth bearer token sent with every request
    pub access_token: String,

    /// API base URL without trailing slash
    pub api_base_url: String,

    /// Transport used for all requests
    pub http_client: Arc<dyn HttpClient>,

    /// Worker threads of the dedicated network runtime
    pub network_threads: usize,

    /// Per request timeout
    pub request_timeout: Duration,

    /// Existing runtime to run network I/O on
    pub runtime_handle: Option<Handle>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("http_client", &"HttpClient { ... }")
            .field("network_threads", &self.network_threads)
            .field("request_timeout", &self.request_timeout)
            .field("runtime_handle", &self.runtime_handle.is_some())
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - the token is not blank
    /// - the base URL is an absolute http(s) URL
    /// - the network thread count is within 1..=64
    /// - the request timeout is non-zero
    /// - a shared runtime is multi-threaded
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("Access token cannot be empty".to_string()));
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(Error::Config(format!(
                "API base URL must be absolute http(s), got \"{}\"",
                self.api_base_url
            )));
        }

        if self.network_threads == 0 || self.network_threads > MAX_NETWORK_THREADS {
            return Err(Error::Config(format!(
                "Network threads must be between 1 and {}, got {}",
                MAX_NETWORK_THREADS, self.network_threads
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(handle) = &self.runtime_handle {
            if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
                return Err(Error::Config(
                    "Shared runtime must be multi-threaded: a current-thread runtime only \
                     makes progress while its owner blocks on it. Build it with \
                     tokio::runtime::Builder::new_multi_thread() or omit .runtime_handle()"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Other hosts: inject an HttpClient with .http_client()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    let client = bridge_desktop::ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
        Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(Arc::new(client))
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    access_token: Option<String>,
    api_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    network_threads: Option<usize>,
    request_timeout: Option<Duration>,
    runtime_handle: Option<Handle>,
}

impl ClientConfigBuilder {
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the API base URL. A trailing slash is removed.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn network_threads(mut self, threads: usize) -> Self {
        self.network_threads = Some(threads);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Run network I/O on an existing multi-threaded runtime. Synchronous
    /// accessors must still be called from threads outside that runtime.
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.runtime_handle = Some(handle);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::Config("Access token is required. Use .access_token() to set it.".to_string())
        })?;

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let config = ClientConfig {
            access_token,
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            http_client,
            network_threads: self.network_threads.unwrap_or(DEFAULT_NETWORK_THREADS),
            request_timeout,
            runtime_handle: self.runtime_handle,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpRequest, HttpResponse};
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn mock_client() -> Arc<dyn HttpClient> {
        Arc::new(MockHttpClient::new())
    }

    #[test]
    fn test_builder_with_defaults() {
        let config = ClientConfig::builder()
            .access_token("token")
            .http_client(mock_client())
            .build()
            .unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.network_threads, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.runtime_handle.is_none());
    }

    #[test]
    fn test_builder_requires_access_token() {
        let result = ClientConfig::builder().http_client(mock_client()).build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("Access token is required")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let result = ClientConfig::builder()
            .access_token("   ")
            .http_client(mock_client())
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_relative_base_url() {
        let result = ClientConfig::builder()
            .access_token("token")
            .api_base_url("api.onedrive.com/v1.0")
            .http_client(mock_client())
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::builder()
            .access_token("token")
            .api_base_url("https://graph.example.test/v1.0/")
            .http_client(mock_client())
            .build()
            .unwrap();
        assert_eq!(config.api_base_url, "https://graph.example.test/v1.0");
    }

    #[test]
    fn test_validate_rejects_thread_count_out_of_range() {
        for threads in [0, 65] {
            let result = ClientConfig::builder()
                .access_token("token")
                .network_threads(threads)
                .http_client(mock_client())
                .build();
            assert!(matches!(result, Err(Error::Config(_))), "threads={}", threads);
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let result = ClientConfig::builder()
            .access_token("token")
            .request_timeout(Duration::ZERO)
            .http_client(mock_client())
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_current_thread_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let result = ClientConfig::builder()
            .access_token("token")
            .http_client(mock_client())
            .runtime_handle(runtime.handle().clone())
            .build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("multi-threaded")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_multi_thread_runtime_is_accepted() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();

        let config = ClientConfig::builder()
            .access_token("token")
            .http_client(mock_client())
            .runtime_handle(runtime.handle().clone())
            .build()
            .unwrap();
        assert!(config.runtime_handle.is_some());
    }

    #[test]
    fn test_debug_never_prints_token() {
        let config = ClientConfig::builder()
            .access_token("super-secret-token")
            .http_client(mock_client())
            .build()
            .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_is_reported() {
        let result = ClientConfig::builder().access_token("token").build();
        assert!(matches!(result, Err(Error::CapabilityMissing { .. })));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_default_http_client() {
        let config = ClientConfig::builder().access_token("token").build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = ClientConfig::builder()
            .access_token("token")
            .http_client(mock_client())
            .build()
            .unwrap();
        let cloned = config.clone();
        assert_eq!(cloned.api_base_url, config.api_base_url);
    }
}
