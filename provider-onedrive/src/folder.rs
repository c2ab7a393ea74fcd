//! Folders and their lazily materialized children.
//!
//! A folder starts `Unmaterialized` unless the server sent its children
//! inline. The first call to a children accessor runs the paginated fetch and
//! publishes the result as one immutable [`Children`] snapshot, so readers
//! see either no children or all three views, never a partial list.
//!
//! Refreshing a folder overwrites its metadata and drops the snapshot
//! unconditionally. Every refresh bumps a generation counter; a fetch that
//! started before a refresh still returns its result to its own caller but
//! does not publish it.
//!
//! Concurrent first accesses are serialized per folder: one thread fetches,
//! the others wait on the folder's fetch guard and then read the published
//! snapshot. This departs from the unsynchronized model, where every thread
//! that finds the folder unmaterialized runs its own fetch and the last
//! publish wins; here a folder costs one paginated fetch per generation.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::decoder;
use crate::error::{OneDriveError, Result};
use crate::fetcher;
use crate::item::{FileItem, Item, ItemFields};
use crate::pointer::PathPointer;
use crate::session::Session;
use crate::transport::Page;
use crate::types::{ItemReference, ItemResource};

/// Materialized children of a folder.
///
/// `all` keeps server order across pages; `folders` and `files` are
/// order-preserving sub-sequences of it. Items that are neither appear in
/// `all` only.
#[derive(Debug, Clone, Default)]
pub struct Children {
    all: Vec<Item>,
    folders: Vec<Arc<FolderItem>>,
    files: Vec<Arc<FileItem>>,
}

impl Children {
    pub(crate) fn new(all: Vec<Item>, folders: Vec<Arc<FolderItem>>, files: Vec<Arc<FileItem>>) -> Self {
        Self {
            all,
            folders,
            files,
        }
    }

    pub fn all(&self) -> &[Item] {
        &self.all
    }

    pub fn folders(&self) -> &[Arc<FolderItem>] {
        &self.folders
    }

    pub fn files(&self) -> &[Arc<FileItem>] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.all.iter()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}

/// Forward-only iterator over a folder's children.
///
/// Holds the snapshot it was created from; a later refresh of the folder
/// does not affect it.
#[derive(Debug, Clone)]
pub struct ChildrenIter {
    children: Arc<Children>,
    next: usize,
}

impl Iterator for ChildrenIter {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        let item = self.children.all.get(self.next)?.clone();
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.all.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildrenIter {}

enum ChildState {
    Unmaterialized,
    Materialized(Arc<Children>),
}

/// Metadata replaced wholesale on refresh.
#[derive(Debug, Clone)]
struct FolderMeta {
    fields: ItemFields,
    child_count: u64,
    special_folder: Option<String>,
    root: bool,
}

impl FolderMeta {
    /// Build metadata and check the root invariant: the root folder has no
    /// parent reference and sits at `/`; every other folder has a parent.
    fn from_resource(resource: &ItemResource) -> Result<Self> {
        let facet = resource.folder.as_ref().ok_or_else(|| {
            OneDriveError::InternalConsistency(format!(
                "item {} has no folder facet",
                resource.id
            ))
        })?;

        let root = resource.root.is_some();
        let mut fields = ItemFields::from_resource(resource);

        if root {
            if resource.parent_reference.is_some() {
                return Err(OneDriveError::InternalConsistency(format!(
                    "root folder {} carries a parent reference",
                    resource.id
                )));
            }
            fields.path = Some(PathPointer::root(Some(root_drive_id(&resource.id))));
        } else if resource.parent_reference.is_none() {
            return Err(OneDriveError::InternalConsistency(format!(
                "folder {} is not root but has no parent reference",
                resource.id
            )));
        }

        Ok(Self {
            fields,
            child_count: facet.child_count,
            special_folder: resource.special_folder.as_ref().map(|s| s.name.clone()),
            root,
        })
    }

    fn drive_id(&self) -> Option<String> {
        if self.root {
            return Some(root_drive_id(&self.fields.id));
        }
        self.fields.drive_id().map(str::to_string)
    }
}

/// The root folder's id is `<drive id>!<n>`.
fn root_drive_id(id: &str) -> String {
    id.split('!').next().unwrap_or(id).to_string()
}

/// A folder with lazily fetched children.
pub struct FolderItem {
    id: String,
    session: Arc<Session>,
    meta: RwLock<FolderMeta>,
    children: RwLock<ChildState>,
    generation: AtomicU64,
    fetch_guard: Mutex<()>,
}

impl FolderItem {
    /// Build a folder from its resource. Inline children, when present, are
    /// decoded (following their next link) and published immediately.
    pub(crate) fn from_resource(session: &Arc<Session>, resource: ItemResource) -> Result<Arc<Self>> {
        let meta = FolderMeta::from_resource(&resource)?;

        let state = match resource.children {
            Some(inline) => {
                let first = Page::new(inline, resource.children_next_link);
                ChildState::Materialized(Arc::new(fetcher::collect_children(session, first)?))
            }
            None => ChildState::Unmaterialized,
        };

        Ok(Arc::new(Self {
            id: resource.id,
            session: Arc::clone(session),
            meta: RwLock::new(meta),
            children: RwLock::new(state),
            generation: AtomicU64::new(0),
            fetch_guard: Mutex::new(()),
        }))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> String {
        self.meta.read().fields.name.clone()
    }

    /// Snapshot of the current metadata.
    pub fn fields(&self) -> ItemFields {
        self.meta.read().fields.clone()
    }

    pub fn e_tag(&self) -> Option<String> {
        self.meta.read().fields.e_tag.clone()
    }

    pub fn parent_reference(&self) -> Option<ItemReference> {
        self.meta.read().fields.parent_reference.clone()
    }

    pub fn path(&self) -> Option<PathPointer> {
        self.meta.read().fields.path.clone()
    }

    /// Drive id: the id prefix for the root folder, the parent's drive
    /// otherwise.
    pub fn drive_id(&self) -> Option<String> {
        self.meta.read().drive_id()
    }

    pub fn is_root(&self) -> bool {
        self.meta.read().root
    }

    pub fn is_special(&self) -> bool {
        self.meta.read().special_folder.is_some()
    }

    /// Name of the special folder (`documents`, `photos`, ...), if any
    pub fn special_folder(&self) -> Option<String> {
        self.meta.read().special_folder.clone()
    }

    /// Child count reported by the server. It may differ from the number of
    /// children actually fetched.
    pub fn children_count(&self) -> u64 {
        self.meta.read().child_count
    }

    pub fn is_children_fetched(&self) -> bool {
        matches!(*self.children.read(), ChildState::Materialized(_))
    }

    fn snapshot(&self) -> Option<Arc<Children>> {
        match &*self.children.read() {
            ChildState::Materialized(children) => Some(Arc::clone(children)),
            ChildState::Unmaterialized => None,
        }
    }

    /// Children of this folder, fetching them if needed.
    ///
    /// On failure nothing is published and the next call fetches again from
    /// the first page.
    pub fn children(&self) -> Result<Arc<Children>> {
        if let Some(children) = self.snapshot() {
            return Ok(children);
        }

        let _guard = self.fetch_guard.lock();
        if let Some(children) = self.snapshot() {
            return Ok(children);
        }

        self.materialize()
    }

    #[instrument(skip(self), fields(folder_id = %self.id))]
    fn materialize(&self) -> Result<Arc<Children>> {
        let generation = self.generation.load(Ordering::Acquire);
        let children = Arc::new(fetcher::fetch_children(&self.session, &self.id)?);

        let mut state = self.children.write();
        if self.generation.load(Ordering::Acquire) == generation {
            *state = ChildState::Materialized(Arc::clone(&children));
            debug!(count = children.len(), "Children published");
        } else {
            debug!("Folder refreshed during fetch, result not published");
        }
        Ok(children)
    }

    pub fn all_children(&self) -> Result<Vec<Item>> {
        Ok(self.children()?.all.clone())
    }

    pub fn folder_children(&self) -> Result<Vec<Arc<FolderItem>>> {
        Ok(self.children()?.folders.clone())
    }

    pub fn file_children(&self) -> Result<Vec<Arc<FileItem>>> {
        Ok(self.children()?.files.clone())
    }

    /// Iterate over all children, fetching them first if needed.
    pub fn iter_children(&self) -> Result<ChildrenIter> {
        Ok(ChildrenIter {
            children: self.children()?,
            next: 0,
        })
    }

    /// Re-fetch this folder's metadata from the server and apply it.
    #[instrument(skip(self), fields(folder_id = %self.id))]
    pub fn refresh(&self) -> Result<()> {
        let path = format!("/drive/items/{}", urlencoding::encode(&self.id));
        let raw = self.session.fetch_json(&path)?;
        let resource = decoder::parse_item(raw)?;
        self.refresh_by(resource)
    }

    /// Overwrite metadata from a fresh payload and drop cached children.
    ///
    /// The payload must describe this same folder. When it fails validation
    /// the folder is left untouched.
    pub fn refresh_by(&self, resource: ItemResource) -> Result<()> {
        if resource.id != self.id {
            return Err(OneDriveError::InternalConsistency(format!(
                "refresh of folder {} with payload for {}",
                self.id, resource.id
            )));
        }
        let meta = FolderMeta::from_resource(&resource)?;

        // Lock order: children, then meta.
        let mut state = self.children.write();
        *self.meta.write() = meta;
        self.generation.fetch_add(1, Ordering::AcqRel);
        let was_fetched = matches!(*state, ChildState::Materialized(_));
        *state = ChildState::Unmaterialized;
        drop(state);

        info!(folder_id = %self.id, was_fetched, "Folder refreshed");
        Ok(())
    }
}

impl fmt::Debug for FolderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children_fetched = self.is_children_fetched();
        let meta = self.meta.read();
        f.debug_struct("FolderItem")
            .field("id", &self.id)
            .field("name", &meta.fields.name)
            .field("root", &meta.root)
            .field("child_count", &meta.child_count)
            .field("children_fetched", &children_fetched)
            .finish()
    }
}
