//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the OneDrive client core:
//! - Logging and tracing infrastructure
//! - Client configuration with fail-fast validation
//!
//! ## Overview
//!
//! Every other crate in the workspace logs through `tracing` and is
//! configured through [`config::ClientConfig`]. Hosts call
//! [`logging::init_logging`] once at startup and build a `ClientConfig`
//! before constructing a client.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
