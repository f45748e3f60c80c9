//! In-process object storage with handle-scoped lifetimes.
//!
//! Binary results (images, PDFs, downloads) are parked here and addressed by
//! an opaque URL. The bytes live exactly as long as the last [`ObjectUrl`]
//! handle that points at them: dropping the final handle releases the entry,
//! and a released entry is never released twice.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Shelf {
    objects: RwLock<HashMap<Uuid, StoredObject>>,
}

/// Keyed byte store handing out [`ObjectUrl`] handles.
pub struct ObjectStore {
    shelf: Arc<Shelf>,
    prefix: String,
}

impl ObjectStore {
    /// Store with the default opaque `memory://` prefix.
    pub fn new() -> Self {
        Self::with_prefix("memory://")
    }

    /// Store whose URLs are rooted at `prefix`, e.g. `/api/v1/objects/`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            shelf: Arc::new(Shelf::default()),
            prefix: prefix.into(),
        }
    }

    /// Park bytes and return the handle that keeps them alive.
    pub fn insert(&self, content_type: impl Into<String>, bytes: Vec<u8>) -> ObjectUrl {
        let id = Uuid::new_v4();
        let object = StoredObject {
            content_type: content_type.into(),
            bytes,
        };
        self.shelf
            .objects
            .write()
            .expect("object shelf lock poisoned")
            .insert(id, object);
        ObjectUrl {
            inner: Arc::new(Handle {
                id,
                url: format!("{}{}", self.prefix, id),
                shelf: Arc::downgrade(&self.shelf),
            }),
        }
    }

    /// Look up a parked object by id. `None` once released.
    pub fn fetch(&self, id: Uuid) -> Option<StoredObject> {
        self.shelf
            .objects
            .read()
            .expect("object shelf lock poisoned")
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.shelf
            .objects
            .read()
            .expect("object shelf lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

struct Handle {
    id: Uuid,
    url: String,
    shelf: Weak<Shelf>,
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Upgrade fails if the store itself is gone, which already freed us.
        if let Some(shelf) = self.shelf.upgrade() {
            shelf
                .objects
                .write()
                .expect("object shelf lock poisoned")
                .remove(&self.id);
        }
    }
}

/// Cloneable reference to a stored object. Clones share one lifetime; the
/// backing bytes are released when the last clone drops.
#[derive(Clone)]
pub struct ObjectUrl {
    inner: Arc<Handle>,
}

impl ObjectUrl {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn as_str(&self) -> &str {
        &self.inner.url
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.inner.url).finish()
    }
}

impl Serialize for ObjectUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
