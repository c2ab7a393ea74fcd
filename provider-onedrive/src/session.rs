//! Per-client session context.
//!
//! A `Session` bundles what every item needs to talk to the server: the
//! transport, the bridge onto the network runtime and the drive cache.
//! Items hold an `Arc<Session>`; nothing here is global.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::bridge::{NetworkBridge, PendingResponse};
use crate::drive::DriveCache;
use crate::error::Result;
use crate::transport::{GraphTransport, Page};

#[derive(Debug)]
pub struct Session {
    transport: Arc<GraphTransport>,
    bridge: NetworkBridge,
    drives: DriveCache,
}

impl Session {
    pub fn new(transport: GraphTransport, bridge: NetworkBridge) -> Self {
        Self {
            transport: Arc::new(transport),
            bridge,
            drives: DriveCache::new(),
        }
    }

    pub fn transport(&self) -> &GraphTransport {
        &self.transport
    }

    pub fn bridge(&self) -> &NetworkBridge {
        &self.bridge
    }

    pub fn drive_cache(&self) -> &DriveCache {
        &self.drives
    }

    /// Issue a page request without waiting for it.
    pub fn fetch_page_async(&self, target: &str) -> PendingResponse<Page> {
        let transport = Arc::clone(&self.transport);
        let url = self.transport.resolve(target);
        debug!(url = %url, "Requesting page");

        let label = format!("GET {}", url);
        self.bridge
            .submit(label, async move { transport.get_page(&url).await })
    }

    /// Fetch one page and wait for it.
    pub fn fetch_page(&self, target: &str) -> Result<Page> {
        self.fetch_page_async(target).wait()
    }

    /// Fetch a single JSON object and wait for it.
    pub fn fetch_json(&self, target: &str) -> Result<Value> {
        let transport = Arc::clone(&self.transport);
        let url = self.transport.resolve(target);

        let label = format!("GET {}", url);
        self.bridge
            .run(label, async move { transport.get_json(&url).await })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory HTTP client and session fixtures for unit tests.

    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
    use bytes::Bytes;
    use core_runtime::config::ClientConfig;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use tokio::runtime::{Builder, Runtime};

    pub const BASE_URL: &str = "https://api.test/v1.0";

    /// Serves canned responses by URL. The last queued response for a URL
    /// is repeated; unknown URLs answer 404 `itemNotFound`.
    #[derive(Default)]
    pub struct FakeHttpClient {
        routes: Mutex<HashMap<String, VecDeque<(u16, String)>>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for an API path or absolute URL.
        pub fn route(&self, target: &str, status: u16, body: impl Into<String>) {
            self.routes
                .lock()
                .entry(absolute(target))
                .or_default()
                .push_back((status, body.into()));
        }

        pub fn calls_to(&self, target: &str) -> usize {
            let url = absolute(target);
            self.calls.lock().iter().filter(|c| **c == url).count()
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().len()
        }
    }

    fn absolute(target: &str) -> String {
        if target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}{}", BASE_URL, target)
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.lock().push(request.url.clone());

            let (status, body) = {
                let mut routes = self.routes.lock();
                match routes.get_mut(&request.url) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            }
            .unwrap_or_else(|| {
                (
                    404,
                    r#"{"error": {"code": "itemNotFound", "message": "Item does not exist"}}"#
                        .to_string(),
                )
            });

            Ok(HttpResponse {
                status,
                headers: HashMap::new(),
                body: Bytes::from(body),
            })
        }
    }

    /// A session on a fresh two-thread runtime. Keep the runtime alive for
    /// as long as the session is used.
    pub fn session(http: Arc<FakeHttpClient>) -> (Runtime, Arc<Session>) {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let config = ClientConfig::builder()
            .access_token("test_token")
            .api_base_url(BASE_URL)
            .http_client(http)
            .build()
            .unwrap();

        let session = Session::new(
            GraphTransport::new(&config),
            NetworkBridge::new(runtime.handle().clone()),
        );
        (runtime, Arc::new(session))
    }
}
