//! # OneDrive Provider
//!
//! Client-side model of a OneDrive store reached over the paginated REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Typed items decoded from API payloads: [`FolderItem`], [`FileItem`] and
//!   [`OtherItem`] behind the closed [`Item`] enum
//! - Lazy folder children: the first call to [`FolderItem::all_children`],
//!   [`FolderItem::folder_children`] or [`FolderItem::file_children`] walks
//!   every page of the collection and publishes all three views at once
//! - Pipelined pagination: the request for page N+1 is in flight while page N
//!   is being classified
//! - A [`DriveCache`] that keeps one canonical [`Drive`] per id for the
//!   lifetime of the client
//!
//! ## Threading
//!
//! Network I/O runs on a Tokio runtime owned (or borrowed) by the
//! [`OneDriveClient`]. The accessors on items are synchronous: they block the
//! calling thread until the response arrives and must not be called from a
//! thread of that runtime.
//!
//! ## Example
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use provider_onedrive::OneDriveClient;
//!
//! let client = OneDriveClient::new(ClientConfig::builder().access_token(token).build()?)?;
//! let root = client.root_folder()?;
//! for child in root.iter_children()? {
//!     println!("{}", child.name());
//! }
//! ```

pub mod bridge;
pub mod client;
pub mod decoder;
pub mod drive;
pub mod error;
pub mod fetcher;
pub mod folder;
pub mod item;
pub mod pointer;
pub mod session;
pub mod transport;
pub mod types;

pub use bridge::{NetworkBridge, PendingResponse};
pub use client::OneDriveClient;
pub use drive::{Drive, DriveCache, Quota};
pub use error::{OneDriveError, Result};
pub use folder::{Children, ChildrenIter, FolderItem};
pub use item::{FileItem, Item, ItemFields, ItemKind, OtherItem};
pub use pointer::PathPointer;
pub use session::Session;
pub use transport::{GraphTransport, Page};
