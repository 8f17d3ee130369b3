use std::collections::HashMap;
use std::sync::RwLock;

use super::{LoadedObject, ObjectStore};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::storable::{codec, ObjectKind};

/// In-memory, HashMap-based object store holding canonical encodings.
///
/// Only built for tests. Follows the same contract as the on-disk [`Database`].
///
/// [`Database`]: super::Database
#[derive(Default)]
pub struct MemoryDatabase {
    objects: RwLock<HashMap<Digest, Vec<u8>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryDatabase {
    fn put(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> Result<Digest> {
        let content = codec::encode(kind, payload);
        let oid = Digest::new(&content);
        if persist {
            let mut map = self.objects.write().expect("lock poisoned");
            map.entry(oid).or_insert(content);
        }
        Ok(oid)
    }

    fn get(&self, oid: &Digest) -> Result<LoadedObject> {
        let map = self.objects.read().expect("lock poisoned");
        let bytes = map.get(oid).ok_or(Error::NotFound(*oid))?;
        let decoded = codec::decode(bytes).map_err(|e| Error::CorruptObject {
            oid: *oid,
            reason: e.to_string(),
        })?;
        Ok(LoadedObject {
            kind: decoded.kind,
            payload: decoded.payload.to_vec(),
        })
    }

    fn exists(&self, oid: &Digest) -> bool {
        self.objects
            .read()
            .expect("lock poisoned")
            .contains_key(oid)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn same_content_produces_same_id() {
        let store = MemoryDatabase::new();
        let a = store.put(ObjectKind::Blob, b"abc", true).unwrap();
        let b = store.put(ObjectKind::Blob, b"abc", true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), "f2ba8f84ab5c1bce84a7b441cb1959cfc7093b7f");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn kind_is_part_of_the_address() {
        let store = MemoryDatabase::new();
        let blob = store.put(ObjectKind::Blob, b"", true).unwrap();
        let tree = store.put(ObjectKind::Tree, b"", true).unwrap();
        assert_ne!(blob, tree);
        assert_eq!(store.get(&tree).unwrap().kind, ObjectKind::Tree);
    }

    #[test]
    fn dry_run_and_missing() {
        let store = MemoryDatabase::new();
        let oid = store.put(ObjectKind::Blob, b"abc", false).unwrap();
        assert!(store.is_empty());
        assert!(!store.exists(&oid));
        assert!(matches!(store.get(&oid), Err(Error::NotFound(_))));
    }
}
