//! Decoding of raw JSON values into items and drives.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::drive::{Drive, DriveCache};
use crate::error::{OneDriveError, Result};
use crate::folder::FolderItem;
use crate::item::{FileItem, Item, OtherItem};
use crate::session::Session;
use crate::transport::json_kind;
use crate::types::{DriveResource, ItemResource};

/// Decode one raw element into its item variant.
///
/// A `folder` facet makes a folder, a `file` facet a file; anything else is
/// [`Item::Other`].
pub fn decode_item(session: &Arc<Session>, raw: Value) -> Result<Item> {
    let resource = parse_item(raw)?;
    item_from_resource(session, resource)
}

pub(crate) fn parse_item(raw: Value) -> Result<ItemResource> {
    if !raw.is_object() {
        return Err(OneDriveError::MalformedResponse(format!(
            "expected an item object, got {}: {}",
            json_kind(&raw),
            raw
        )));
    }
    serde_json::from_value(raw)
        .map_err(|e| OneDriveError::MalformedResponse(format!("invalid item: {}", e)))
}

pub(crate) fn item_from_resource(session: &Arc<Session>, resource: ItemResource) -> Result<Item> {
    if resource.folder.is_some() {
        return Ok(Item::Folder(FolderItem::from_resource(session, resource)?));
    }
    if resource.file.is_some() {
        return Ok(Item::File(Arc::new(FileItem::from_resource(&resource))));
    }
    Ok(Item::Other(Arc::new(OtherItem::from_resource(&resource))))
}

/// Decode a drive and resolve it to its canonical instance.
///
/// When the id is already cached the payload is discarded and the cached
/// instance returned unchanged.
#[instrument(skip(cache, raw))]
pub fn decode_drive(cache: &DriveCache, raw: Value) -> Result<Arc<Drive>> {
    if !raw.is_object() {
        return Err(OneDriveError::MalformedResponse(format!(
            "expected a drive object, got {}",
            json_kind(&raw)
        )));
    }
    let resource: DriveResource = serde_json::from_value(raw)
        .map_err(|e| OneDriveError::MalformedResponse(format!("invalid drive: {}", e)))?;

    let id = resource.id.clone();
    Ok(cache.get_or_insert_with(&id, move || Drive::from(resource)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::session::test_support::{session, FakeHttpClient};
    use serde_json::json;

    #[test]
    fn test_decode_variants() {
        let (_rt, session) = session(Arc::new(FakeHttpClient::new()));
        let parent = json!({"driveId": "abc", "path": "/drive/root:"});

        let folder = decode_item(
            &session,
            json!({"id": "F", "name": "Docs", "folder": {"childCount": 3}, "parentReference": parent.clone()}),
        )
        .unwrap();
        let file = decode_item(
            &session,
            json!({"id": "A", "name": "a.txt", "file": {"mimeType": "text/plain"}, "parentReference": parent.clone()}),
        )
        .unwrap();
        let other = decode_item(
            &session,
            json!({"id": "N", "name": "Notes", "package": {"type": "oneNote"}, "parentReference": parent}),
        )
        .unwrap();

        assert_eq!(folder.kind(), ItemKind::Folder);
        assert_eq!(folder.as_folder().unwrap().children_count(), 3);
        assert_eq!(file.kind(), ItemKind::File);
        assert_eq!(other.kind(), ItemKind::Other);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let (_rt, session) = session(Arc::new(FakeHttpClient::new()));

        for raw in [json!("A!1"), json!(null), json!([1])] {
            assert!(matches!(
                decode_item(&session, raw),
                Err(OneDriveError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_decode_rejects_item_without_id() {
        let (_rt, session) = session(Arc::new(FakeHttpClient::new()));
        let result = decode_item(&session, json!({"name": "nameless", "file": {}}));
        assert!(matches!(result, Err(OneDriveError::MalformedResponse(_))));
    }

    #[test]
    fn test_decode_drive_first_seen_wins() {
        let cache = DriveCache::new();

        let first = decode_drive(
            &cache,
            json!({"id": "b!XYZ", "driveType": "business", "quota": {"total": 100, "used": 40, "remaining": 60}}),
        )
        .unwrap();
        let second = decode_drive(&cache, json!({"id": "b!XYZ", "quota": {"total": 999}})).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let quota = second.quota().unwrap();
        assert_eq!(quota.total, Some(100));
        assert_eq!(quota.remaining, Some(60));
        assert_eq!(second.drive_type(), Some("business"));
    }

    #[test]
    fn test_decode_drive_rejects_bad_shape() {
        let cache = DriveCache::new();
        assert!(matches!(
            decode_drive(&cache, json!({"driveType": "personal"})),
            Err(OneDriveError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_drive(&cache, json!(7)),
            Err(OneDriveError::MalformedResponse(_))
        ));
        assert!(cache.is_empty());
    }
}
