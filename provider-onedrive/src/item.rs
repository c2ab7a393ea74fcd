//! Typed items decoded from API payloads.
//!
//! Every element of a children page decodes into exactly one [`Item`]
//! variant. Folders carry lazy child state and live in [`crate::folder`];
//! files and everything else (packages such as OneNote notebooks, items
//! with facets this client does not model) are plain immutable values.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::folder::FolderItem;
use crate::pointer::PathPointer;
use crate::types::{IdentitySet, ItemReference, ItemResource};

/// Metadata shared by every kind of item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub id: String,
    pub name: String,
    pub e_tag: Option<String>,
    pub c_tag: Option<String>,
    pub size: Option<u64>,
    pub web_url: Option<String>,
    pub description: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_modified_date_time: Option<DateTime<Utc>>,
    pub created_by: Option<IdentitySet>,
    pub last_modified_by: Option<IdentitySet>,
    /// Weak link to the parent: ids and path only, never the parent object
    pub parent_reference: Option<ItemReference>,
    pub path: Option<PathPointer>,
}

impl ItemFields {
    pub(crate) fn from_resource(resource: &ItemResource) -> Self {
        let path = resource.parent_reference.as_ref().and_then(|parent| {
            parent.path.as_deref().and_then(|parent_path| {
                PathPointer::from_parent_path(parent_path, &resource.name, parent.drive_id.clone())
            })
        });

        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
            e_tag: resource.e_tag.clone(),
            c_tag: resource.c_tag.clone(),
            size: resource.size,
            web_url: resource.web_url.clone(),
            description: resource.description.clone(),
            created_date_time: resource.created_date_time,
            last_modified_date_time: resource.last_modified_date_time,
            created_by: resource.created_by.clone(),
            last_modified_by: resource.last_modified_by.clone(),
            parent_reference: resource.parent_reference.clone(),
            path,
        }
    }

    /// Drive the item lives in, as reported by its parent reference.
    pub fn drive_id(&self) -> Option<&str> {
        self.parent_reference
            .as_ref()
            .and_then(|parent| parent.drive_id.as_deref())
    }
}

/// A file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileItem {
    fields: ItemFields,
    mime_type: Option<String>,
}

impl FileItem {
    pub(crate) fn from_resource(resource: &ItemResource) -> Self {
        Self {
            fields: ItemFields::from_resource(resource),
            mime_type: resource
                .file
                .as_ref()
                .and_then(|facet| facet.mime_type.clone()),
        }
    }

    pub fn id(&self) -> &str {
        &self.fields.id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn fields(&self) -> &ItemFields {
        &self.fields
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.fields.size
    }

    pub fn path(&self) -> Option<&PathPointer> {
        self.fields.path.as_ref()
    }
}

/// An item that is neither a folder nor a file, e.g. a OneNote package.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherItem {
    fields: ItemFields,
    package_type: Option<String>,
}

impl OtherItem {
    pub(crate) fn from_resource(resource: &ItemResource) -> Self {
        Self {
            fields: ItemFields::from_resource(resource),
            package_type: resource
                .package
                .as_ref()
                .and_then(|facet| facet.package_type.clone()),
        }
    }

    pub fn id(&self) -> &str {
        &self.fields.id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn fields(&self) -> &ItemFields {
        &self.fields
    }

    /// Package type such as `oneNote`, when the item is a package
    pub fn package_type(&self) -> Option<&str> {
        self.package_type.as_deref()
    }
}

/// Kind of an [`Item`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Folder,
    File,
    Other,
}

/// A decoded item. The variant is fixed at decode time.
#[derive(Debug, Clone)]
pub enum Item {
    Folder(Arc<FolderItem>),
    File(Arc<FileItem>),
    Other(Arc<OtherItem>),
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Folder(folder) => folder.id(),
            Item::File(file) => file.id(),
            Item::Other(other) => other.id(),
        }
    }

    /// Current name. A folder's name can change when it is refreshed.
    pub fn name(&self) -> String {
        match self {
            Item::Folder(folder) => folder.name(),
            Item::File(file) => file.name().to_string(),
            Item::Other(other) => other.name().to_string(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Folder(_) => ItemKind::Folder,
            Item::File(_) => ItemKind::File,
            Item::Other(_) => ItemKind::Other,
        }
    }

    pub fn as_folder(&self) -> Option<&Arc<FolderItem>> {
        match self {
            Item::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<FileItem>> {
        match self {
            Item::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(json: &str) -> ItemResource {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_file_fields_and_path() {
        let file = FileItem::from_resource(&resource(
            r#"{
                "id": "ABC!7",
                "name": "cv.pdf",
                "size": 2048,
                "file": {"mimeType": "application/pdf"},
                "parentReference": {"driveId": "abc", "id": "ABC!3", "path": "/drive/root:/Documents"}
            }"#,
        ));

        assert_eq!(file.id(), "ABC!7");
        assert_eq!(file.name(), "cv.pdf");
        assert_eq!(file.size(), Some(2048));
        assert_eq!(file.mime_type(), Some("application/pdf"));
        assert_eq!(file.path().unwrap().path(), "/Documents/cv.pdf");
        assert_eq!(file.fields().drive_id(), Some("abc"));
    }

    #[test]
    fn test_item_without_parent_path_has_no_pointer() {
        let file = FileItem::from_resource(&resource(
            r#"{"id": "ABC!8", "name": "a.txt", "file": {}, "parentReference": {"driveId": "abc"}}"#,
        ));
        assert!(file.path().is_none());
        assert!(file.mime_type().is_none());
    }

    #[test]
    fn test_package_item() {
        let other = OtherItem::from_resource(&resource(
            r#"{"id": "ABC!9", "name": "Notebook", "package": {"type": "oneNote"}, "parentReference": {"driveId": "abc"}}"#,
        ));

        let item = Item::Other(Arc::new(other));
        assert_eq!(item.kind(), ItemKind::Other);
        assert_eq!(item.id(), "ABC!9");
        assert_eq!(item.name(), "Notebook");
        assert!(item.as_folder().is_none());
        assert!(item.as_file().is_none());
        if let Item::Other(other) = &item {
            assert_eq!(other.package_type(), Some("oneNote"));
        }
    }

    #[test]
    fn test_file_variant_accessors() {
        let file = FileItem::from_resource(&resource(
            r#"{"id": "ABC!10", "name": "song.mp3", "file": {"mimeType": "audio/mpeg"}}"#,
        ));
        let item = Item::File(Arc::new(file));

        assert_eq!(item.kind(), ItemKind::File);
        assert!(!item.is_folder());
        assert_eq!(item.as_file().unwrap().mime_type(), Some("audio/mpeg"));
    }
}
