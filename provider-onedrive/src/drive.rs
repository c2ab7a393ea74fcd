//! Drives and the canonical drive cache.
//!
//! A [`Drive`] is immutable once built. The [`DriveCache`] guarantees that
//! every decode of a given drive id during the client's lifetime yields the
//! same `Arc<Drive>`: the first instance published for an id wins and later
//! payloads for that id are discarded, including their quota values.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

use crate::types::{DriveResource, IdentitySet, QuotaResource};

/// Storage quota of a drive. Every field is reported independently by the
/// server and may be absent; nothing is derived locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quota {
    pub state: Option<String>,
    pub total: Option<u64>,
    pub used: Option<u64>,
    pub deleted: Option<u64>,
    pub remaining: Option<u64>,
}

impl From<QuotaResource> for Quota {
    fn from(resource: QuotaResource) -> Self {
        Self {
            state: resource.state,
            total: resource.total,
            used: resource.used,
            deleted: resource.deleted,
            remaining: resource.remaining,
        }
    }
}

/// A OneDrive drive. Equality and hashing consider the id only.
#[derive(Debug, Clone)]
pub struct Drive {
    id: String,
    drive_type: Option<String>,
    owner: Option<IdentitySet>,
    quota: Option<Quota>,
}

impl Drive {
    pub fn new(
        id: impl Into<String>,
        drive_type: Option<String>,
        owner: Option<IdentitySet>,
        quota: Option<Quota>,
    ) -> Self {
        Self {
            id: id.into(),
            drive_type,
            owner,
            quota,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `personal`, `business` or `documentLibrary`
    pub fn drive_type(&self) -> Option<&str> {
        self.drive_type.as_deref()
    }

    pub fn owner(&self) -> Option<&IdentitySet> {
        self.owner.as_ref()
    }

    pub fn quota(&self) -> Option<&Quota> {
        self.quota.as_ref()
    }
}

impl From<DriveResource> for Drive {
    fn from(resource: DriveResource) -> Self {
        Self {
            id: resource.id,
            drive_type: resource.drive_type,
            owner: resource.owner,
            quota: resource.quota.map(Quota::from),
        }
    }
}

impl PartialEq for Drive {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Drive {}

impl Hash for Drive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Registry of canonical drive instances, keyed by id.
///
/// Owned by the client session and shared by reference. Entries are never
/// evicted; the cache lives as long as the session.
#[derive(Debug, Default)]
pub struct DriveCache {
    drives: RwLock<HashMap<String, Arc<Drive>>>,
}

impl DriveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Drive>> {
        self.drives.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.drives.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.drives.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.read().is_empty()
    }

    /// Return the canonical drive for `id`, building it with `build` only if
    /// no instance is published yet.
    ///
    /// `build` runs outside the lock. If another thread publishes the same id
    /// in the meantime, its instance is returned and ours is dropped.
    pub fn get_or_insert_with<F>(&self, id: &str, build: F) -> Arc<Drive>
    where
        F: FnOnce() -> Drive,
    {
        if let Some(existing) = self.get(id) {
            return existing;
        }

        let candidate = Arc::new(build());
        debug_assert_eq!(candidate.id(), id, "drive built for a different id");

        let mut drives = self.drives.write();
        let canonical = drives
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(drive_id = %id, "Caching drive");
                Arc::clone(&candidate)
            });
        Arc::clone(canonical)
    }

    /// Canonicalize an already built drive.
    pub fn canonicalize(&self, drive: Drive) -> Arc<Drive> {
        let id = drive.id.clone();
        self.get_or_insert_with(&id, move || drive)
    }
}
