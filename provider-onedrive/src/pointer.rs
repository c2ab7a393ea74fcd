//! Path pointers: an item addressed by its drive and its path from the root.

use std::fmt;

/// Marker separating the drive prefix from the item path in API paths.
const ROOT_MARKER: &str = "root:";

/// Location of an item as `(drive, path)`, where `path` starts at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPointer {
    drive_id: Option<String>,
    path: String,
}

impl PathPointer {
    /// Pointer to the root folder of a drive.
    pub fn root(drive_id: Option<String>) -> Self {
        Self {
            drive_id,
            path: "/".to_string(),
        }
    }

    /// Pointer built from a path; a missing leading `/` is added.
    pub fn new(path: impl Into<String>, drive_id: Option<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self { drive_id, path }
    }

    /// Derive a child's pointer from its parent's API path
    /// (`/drive/root:/Documents`) and its own name.
    ///
    /// Returns `None` when the parent path is not rooted in a drive.
    pub fn from_parent_path(parent_api_path: &str, name: &str, drive_id: Option<String>) -> Option<Self> {
        let (_, rest) = parent_api_path.split_once(ROOT_MARKER)?;
        let parent = rest.trim_end_matches('/');
        Some(Self {
            drive_id,
            path: format!("{}/{}", parent, name),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn drive_id(&self) -> Option<&str> {
        self.drive_id.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// API path addressing this item, with each segment percent-encoded.
    pub fn to_api(&self) -> String {
        let prefix = match &self.drive_id {
            Some(drive) => format!("/drives/{}/root", drive),
            None => "/drive/root".to_string(),
        };
        if self.is_root() {
            return prefix;
        }
        let encoded: Vec<String> = self
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}:/{}", prefix, encoded.join("/"))
    }
}

impl fmt::Display for PathPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_pointer() {
        let root = PathPointer::root(Some("ABC".to_string()));
        assert!(root.is_root());
        assert_eq!(root.path(), "/");
        assert_eq!(root.to_api(), "/drives/ABC/root");
    }

    #[test]
    fn test_child_of_root() {
        let pointer = PathPointer::from_parent_path("/drive/root:", "Documents", None).unwrap();
        assert_eq!(pointer.path(), "/Documents");
        assert_eq!(pointer.to_api(), "/drive/root:/Documents");
    }

    #[test]
    fn test_nested_child_is_encoded_for_api() {
        let pointer =
            PathPointer::from_parent_path("/drive/root:/My Documents", "tax 2017.pdf", None)
                .unwrap();
        assert_eq!(pointer.path(), "/My Documents/tax 2017.pdf");
        assert_eq!(
            pointer.to_api(),
            "/drive/root:/My%20Documents/tax%202017.pdf"
        );
    }

    #[test]
    fn test_parent_path_without_root_marker() {
        assert!(PathPointer::from_parent_path("/drive/items/ABC!1", "x", None).is_none());
    }

    #[test]
    fn test_new_adds_leading_slash() {
        assert_eq!(PathPointer::new("Music", None).path(), "/Music");
        assert_eq!(PathPointer::new("/Music", None).to_string(), "/Music");
    }
}
