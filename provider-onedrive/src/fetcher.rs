//! Paginated children retrieval.
//!
//! Pages are stitched together through their `@odata.nextLink`. The request
//! for page N+1 is put on the wire before page N is decoded, so decoding
//! overlaps with network latency. The first failure aborts the whole run and
//! nothing is returned; callers publish only complete results.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::decoder;
use crate::error::Result;
use crate::folder::{Children, FolderItem};
use crate::item::{FileItem, Item};
use crate::session::Session;
use crate::transport::Page;

/// API path listing the children of a folder.
pub(crate) fn children_path(folder_id: &str) -> String {
    format!("/drive/items/{}/children", urlencoding::encode(folder_id))
}

/// Fetch every page of a folder's children, starting with the first.
pub(crate) fn fetch_children(session: &Arc<Session>, folder_id: &str) -> Result<Children> {
    let first = session.fetch_page(&children_path(folder_id))?;
    collect_children(session, first)
}

/// Decode `first` and every page after it into the three children views.
#[instrument(skip(session, first), fields(first_page = first.elements.len()))]
pub(crate) fn collect_children(session: &Arc<Session>, first: Page) -> Result<Children> {
    let mut builder = ChildrenBuilder::default();
    let mut current = first;
    let mut pages = 1usize;

    loop {
        let Page { elements, next_link } = current;

        let Some(next_link) = next_link else {
            builder.extend(session, elements)?;
            break;
        };

        let pending = session.fetch_page_async(&next_link);
        builder.extend(session, elements)?;
        current = pending.wait()?;
        pages += 1;
    }

    let children = builder.finish();
    debug!(
        pages,
        total = children.len(),
        folders = children.folders().len(),
        files = children.files().len(),
        "Children collected"
    );
    Ok(children)
}

/// Accumulates decoded children until the last page has been seen.
#[derive(Default)]
struct ChildrenBuilder {
    all: Vec<Item>,
    folders: Vec<Arc<FolderItem>>,
    files: Vec<Arc<FileItem>>,
}

impl ChildrenBuilder {
    fn extend(&mut self, session: &Arc<Session>, elements: Vec<Value>) -> Result<()> {
        self.all.reserve(elements.len());
        for raw in elements {
            let item = decoder::decode_item(session, raw)?;
            self.push(item);
        }
        Ok(())
    }

    fn push(&mut self, item: Item) {
        match &item {
            Item::Folder(folder) => self.folders.push(Arc::clone(folder)),
            Item::File(file) => self.files.push(Arc::clone(file)),
            // Listed in `all` only
            Item::Other(_) => {}
        }
        self.all.push(item);
    }

    fn finish(self) -> Children {
        Children::new(self.all, self.folders, self.files)
    }
}
