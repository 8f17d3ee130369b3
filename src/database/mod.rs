//! Content-addressed object storage.
//!
//! Objects are keyed by the digest of their canonical encoding, so the same content always lands
//! under the same key and a write is never an update.

pub mod disk;
#[cfg(test)]
pub mod memory;

pub use disk::Database;

use crate::digest::Digest;
use crate::error::Result;
use crate::storable::{ObjectKind, Storable};

/// An object read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedObject {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

pub trait ObjectStore {
    /// Encode `payload` as an object of `kind` and return its address.
    ///
    /// When `persist` is false nothing is written; the address is still computed. Storing the
    /// same object twice is a no-op the second time.
    fn put(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> Result<Digest>;

    /// Read the object stored under `oid`.
    fn get(&self, oid: &Digest) -> Result<LoadedObject>;

    fn exists(&self, oid: &Digest) -> bool;

    fn store<T: Storable>(&self, obj: &T, persist: bool) -> Result<Digest>
    where
        Self: Sized,
    {
        self.put(T::KIND, &obj.payload(), persist)
    }
}
