//! OneDrive API response types
//!
//! Data structures for deserializing OneDrive API v1.0 payloads. Only the
//! fields the item model consumes are declared; unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a collection (`/children`, `/drives`).
///
/// See: https://docs.microsoft.com/onedrive/developer/rest-api/concepts/paging
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    /// Raw, undecoded elements in server order
    pub value: Vec<Value>,

    /// Absolute URL of the next page, absent on the last page
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Error envelope returned with non-success statuses.
///
/// See: https://docs.microsoft.com/onedrive/developer/rest-api/concepts/errors
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Identity of a user, application or device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Set of identities attached to an action or resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySet {
    #[serde(default)]
    pub user: Option<Identity>,
    #[serde(default)]
    pub application: Option<Identity>,
    #[serde(default)]
    pub device: Option<Identity>,
}

/// Reference from an item to its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// API path of the parent, e.g. `/drive/root:/Documents`
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Child count reported by the server; may be stale
    #[serde(default)]
    pub child_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageFacet {
    #[serde(rename = "type", default)]
    pub package_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialFolderFacet {
    pub name: String,
}

/// An item resource (folder, file, package, ...).
///
/// See: https://docs.microsoft.com/onedrive/developer/rest-api/resources/driveitem
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub e_tag: Option<String>,
    #[serde(default)]
    pub c_tag: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<IdentitySet>,
    #[serde(default)]
    pub last_modified_by: Option<IdentitySet>,
    #[serde(default)]
    pub parent_reference: Option<ItemReference>,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub file: Option<FileFacet>,
    #[serde(default)]
    pub package: Option<PackageFacet>,
    #[serde(default)]
    pub special_folder: Option<SpecialFolderFacet>,
    /// Present (usually as `{}`) only on the drive's root folder
    #[serde(default)]
    pub root: Option<Value>,
    /// Inline first page of children when requested with `$expand=children`
    #[serde(default)]
    pub children: Option<Vec<Value>>,
    #[serde(rename = "children@odata.nextLink", default)]
    pub children_next_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaResource {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub used: Option<u64>,
    #[serde(default)]
    pub deleted: Option<u64>,
    #[serde(default)]
    pub remaining: Option<u64>,
}

/// A drive resource.
///
/// See: https://docs.microsoft.com/onedrive/developer/rest-api/resources/drive
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveResource {
    pub id: String,
    #[serde(default)]
    pub drive_type: Option<String>,
    #[serde(default, alias = "identitySet")]
    pub owner: Option<IdentitySet>,
    #[serde(default)]
    pub quota: Option<QuotaResource>,
}
