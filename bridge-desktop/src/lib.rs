//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls, connection pooling and
//!   backoff on throttling (429) and server errors (5xx)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::time::Duration;
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! // Hand it to `ClientConfig::builder().http_client(Arc::new(http_client))`
//! ```

mod http;

pub use http::ReqwestHttpClient;
