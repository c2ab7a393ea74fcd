//! Workspace facade crate.
//!
//! Host applications can depend on `onedrive-workspace` and get the OneDrive
//! provider together with the runtime configuration and logging helpers,
//! without wiring each workspace crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{config, logging};
#[cfg(feature = "desktop-shims")]
pub use provider_onedrive::*;
