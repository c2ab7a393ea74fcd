//! OneDrive client entry point.
//!
//! # Example
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use provider_onedrive::OneDriveClient;
//!
//! let config = ClientConfig::builder().access_token(token).build()?;
//! let client = OneDriveClient::new(config)?;
//!
//! let root = client.root_folder()?;
//! for child in root.iter_children()? {
//!     println!("{} ({:?})", child.name(), child.kind());
//! }
//! ```
//!
//! All accessors block the calling thread while network I/O runs on the
//! client's network runtime. Call them from ordinary threads; a call made
//! inside a Tokio runtime context (a task, `block_on`, or the blocking pool)
//! fails with [`OneDriveError::InternalConsistency`]. Async code can hand the
//! work to a `std::thread` and await the result over a channel.

use core_runtime::config::ClientConfig;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::{info, instrument};

use crate::bridge::NetworkBridge;
use crate::decoder;
use crate::drive::{Drive, DriveCache};
use crate::error::{OneDriveError, Result};
use crate::folder::FolderItem;
use crate::item::Item;
use crate::pointer::PathPointer;
use crate::session::Session;
use crate::transport::GraphTransport;

/// A OneDrive client session.
///
/// Owns the network runtime (unless one was supplied through
/// [`ClientConfig::runtime_handle`]) and the drive cache. Items obtained from
/// the client keep the session alive, but their network calls fail with
/// [`OneDriveError::InterruptedWait`] once the client is dropped and its
/// runtime shut down.
pub struct OneDriveClient {
    session: Arc<Session>,
    runtime: Option<Runtime>,
}

impl OneDriveClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let (handle, runtime) = match &config.runtime_handle {
            Some(handle) => (handle.clone(), None),
            None => {
                let runtime = Builder::new_multi_thread()
                    .worker_threads(config.network_threads)
                    .thread_name("onedrive-net")
                    .enable_all()
                    .build()
                    .map_err(|e| {
                        core_runtime::Error::Runtime(format!(
                            "failed to start network runtime: {}",
                            e
                        ))
                    })?;
                (runtime.handle().clone(), Some(runtime))
            }
        };

        info!(
            base_url = %config.api_base_url,
            network_threads = config.network_threads,
            shared_runtime = runtime.is_none(),
            "OneDrive client created"
        );

        let session = Session::new(GraphTransport::new(&config), NetworkBridge::new(handle));
        Ok(Self {
            session: Arc::new(session),
            runtime,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Canonical drives seen by this client.
    pub fn drive_cache(&self) -> &DriveCache {
        self.session.drive_cache()
    }

    /// The root folder of the default drive.
    #[instrument(skip(self))]
    pub fn root_folder(&self) -> Result<Arc<FolderItem>> {
        match self.fetch_item("/drive/root")? {
            Item::Folder(folder) => Ok(folder),
            other => Err(OneDriveError::InternalConsistency(format!(
                "drive root {} is not a folder",
                other.id()
            ))),
        }
    }

    #[instrument(skip(self))]
    pub fn get_item(&self, id: &str) -> Result<Item> {
        self.fetch_item(&format!("/drive/items/{}", urlencoding::encode(id)))
    }

    /// Fetch an item that must be a folder.
    pub fn get_folder(&self, id: &str) -> Result<Arc<FolderItem>> {
        match self.get_item(id)? {
            Item::Folder(folder) => Ok(folder),
            _ => Err(OneDriveError::NotAFolder(id.to_string())),
        }
    }

    #[instrument(skip(self, pointer), fields(path = %pointer))]
    pub fn get_item_by_path(&self, pointer: &PathPointer) -> Result<Item> {
        self.fetch_item(&pointer.to_api())
    }

    /// The signed-in user's default drive.
    #[instrument(skip(self))]
    pub fn default_drive(&self) -> Result<Arc<Drive>> {
        let raw = self.session.fetch_json("/drive")?;
        decoder::decode_drive(self.drive_cache(), raw)
    }

    /// Every drive available to the user, following pagination.
    #[instrument(skip(self))]
    pub fn all_drives(&self) -> Result<Vec<Arc<Drive>>> {
        let mut drives = Vec::new();
        let mut page = self.session.fetch_page("/drives")?;

        loop {
            for raw in page.elements {
                drives.push(decoder::decode_drive(self.drive_cache(), raw)?);
            }
            match page.next_link {
                Some(next_link) => page = self.session.fetch_page(&next_link)?,
                None => break,
            }
        }

        info!(count = drives.len(), "Drives listed");
        Ok(drives)
    }

    fn fetch_item(&self, target: &str) -> Result<Item> {
        let raw = self.session.fetch_json(target)?;
        decoder::decode_item(&self.session, raw)
    }
}

impl Drop for OneDriveClient {
    fn drop(&mut self) {
        // Dropping a runtime blocks, which panics inside async contexts.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
