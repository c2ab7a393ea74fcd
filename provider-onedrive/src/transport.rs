//! HTTP access to the OneDrive API.
//!
//! `GraphTransport` turns API paths into authenticated `GET` requests on the
//! injected [`HttpClient`] and maps responses onto the provider error
//! taxonomy. It never retries: a failed request is reported as-is and the
//! caller decides whether to try again.

use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_runtime::config::ClientConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{OneDriveError, Result};
use crate::types::{ErrorEnvelope, PageResponse};

/// One page of a collection: raw elements in server order and the link to
/// the next page, if any.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Value>,
    pub next_link: Option<String>,
}

impl Page {
    pub fn new(elements: Vec<Value>, next_link: Option<String>) -> Self {
        Self {
            elements,
            next_link,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }
}

impl From<PageResponse> for Page {
    fn from(response: PageResponse) -> Self {
        Self {
            elements: response.value,
            next_link: response.next_link,
        }
    }
}

/// Authenticated, non-retrying access to the OneDrive REST API.
pub struct GraphTransport {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    access_token: String,
    timeout: Duration,
}

impl fmt::Debug for GraphTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphTransport")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GraphTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            base_url: config.api_base_url.clone(),
            access_token: config.access_token.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `target`.
    ///
    /// Absolute URLs (such as `@odata.nextLink` values) are used verbatim;
    /// anything else is treated as an API path below the base URL.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("https://") || target.starts_with("http://") {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }

    /// `GET` a resource and return the successful response.
    #[instrument(skip(self), fields(url = tracing::field::Empty))]
    pub async fn get(&self, target: &str) -> Result<HttpResponse> {
        let url = self.resolve(target);
        tracing::Span::current().record("url", url.as_str());

        let request = HttpRequest::get(url.as_str())
            .bearer_token(self.access_token.as_str())
            .accept_json()
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await?;
        if response.status == 200 {
            debug!(status = response.status, bytes = response.body.len(), "Request succeeded");
            return Ok(response);
        }

        let error = error_from_response(&response);
        warn!(status = response.status, error = %error, "Request failed");
        Err(error)
    }

    /// `GET` a resource and decode its body as `T`.
    pub async fn get_resource<T: DeserializeOwned>(&self, target: &str) -> Result<T> {
        let response = self.get(target).await?;
        parse_body(&response)
    }

    /// `GET` a resource and return its body as an untyped JSON object.
    pub async fn get_json(&self, target: &str) -> Result<Value> {
        let value: Value = self.get_resource(target).await?;
        if !value.is_object() {
            return Err(OneDriveError::MalformedResponse(format!(
                "expected a JSON object from {}, got {}",
                target,
                json_kind(&value)
            )));
        }
        Ok(value)
    }

    /// `GET` one page of a collection.
    pub async fn get_page(&self, target: &str) -> Result<Page> {
        let page: PageResponse = self.get_resource(target).await?;
        Ok(page.into())
    }
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        OneDriveError::MalformedResponse(format!(
            "status {}: {}: {}",
            response.status,
            e,
            response.text_lossy()
        ))
    })
}

/// Map a non-success response onto a protocol error, or a malformed
/// response when the error body is not the documented envelope.
fn error_from_response(response: &HttpResponse) -> OneDriveError {
    match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => OneDriveError::Protocol {
            status: response.status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => OneDriveError::MalformedResponse(format!(
            "status {} with undecodable error body: {}",
            response.status,
            response.text_lossy()
        )),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
