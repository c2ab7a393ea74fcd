//! # Host Bridge Traits
//!
//! Capability traits the OneDrive client core consumes from its host.
//!
//! ## Overview
//!
//! The core never talks to a socket or a log file directly. Instead it is
//! handed implementations of the traits in this crate:
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP execution (TLS, pooling,
//!   transport-level retry are the implementation's business)
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to the
//!   host logging pipeline
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//!
//! ## Error Handling
//!
//! All bridge traits report failures through [`BridgeError`](error::BridgeError).
//! Implementations should convert platform-specific errors and keep enough
//! context (URL, status) in the message for the caller to act on.
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync`: the client shares one implementation
//! between caller threads and the network runtime's worker threads.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
