use std::io::Read;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::*;

use super::{LoadedObject, ObjectStore};
use crate::digest::Digest;
use crate::error::{Error, Result, WithPath};
use crate::storable::codec;
use crate::storable::ObjectKind;
use crate::util;

/// Loose objects under `<git dir>/objects`, one zlib-compressed file per object at
/// `objects/<first 2 hex chars>/<remaining 38 hex chars>`.
///
/// The objects directory itself must already exist; only the prefix directories are created here.
pub struct Database {
    database_root: Utf8PathBuf,
    verify: bool,
}

impl Database {
    pub fn new(git_folder: impl AsRef<Utf8Path>) -> Self {
        Self {
            database_root: git_folder.as_ref().join("objects"),
            verify: false,
        }
    }

    /// Recompute the digest of every object read and fail with [`Error::AddressMismatch`] if it
    /// does not match the address it was stored under.
    pub fn verify_reads(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn root(&self) -> &Utf8Path {
        &self.database_root
    }

    pub fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let mut x = self.database_root.to_owned();
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        debug_assert_eq!(prefix.len(), 2);
        x.push(prefix);
        x.push(suffix);
        x
    }

    fn write_object(&self, object_path: &Utf8Path, content: &[u8]) -> Result<()> {
        let dirname = object_path
            .parent()
            .ok_or_else(|| Error::NotARepository(object_path.to_owned()))?;

        // Concurrent writers may race to create the same prefix directory; an existing one is
        // fine.
        std::fs::create_dir_all(dirname).with_path(dirname)?;

        let mut e = ZlibEncoder::new(Vec::with_capacity(content.len()), Compression::fast());
        e.write_all(content).with_path(object_path)?;
        let compressed_bytes = e.finish().with_path(object_path)?;

        let temp_path = dirname.join(util::tmp_file_name());
        let result = std::fs::write(&temp_path, &compressed_bytes)
            .with_path(&temp_path)
            .and_then(|()| std::fs::rename(&temp_path, object_path).with_path(object_path));

        if let Err(ref e) = result {
            warn!(path=%temp_path, error=%e, "Removing temporary object file after failed write");
            // The write error is the one reported.
            let _ = std::fs::remove_file(&temp_path);
        }
        result
    }

    fn read_to_vec(&self, oid: &Digest) -> Result<Vec<u8>> {
        trace!(object=%oid.to_hex(), "Reading object from database");

        let object_path = self.object_path(oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(*oid))
            }
            Err(e) => return Err(e).with_path(&object_path),
        };

        let mut d = ZlibDecoder::new(&*compressed);

        let mut decompressed = Vec::new();

        d.read_to_end(&mut decompressed)
            .map_err(|e| Error::CorruptObject {
                oid: *oid,
                reason: format!("decompression failed: {e}"),
            })?;

        Ok(decompressed)
    }
}

impl ObjectStore for Database {
    fn put(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> Result<Digest> {
        let content = codec::encode(kind, payload);
        let oid = Digest::new(&content);

        if !persist {
            trace!(oid=%oid.short(), %kind, "Computed object address without writing");
            return Ok(oid);
        }

        let object_path = self.object_path(&oid);

        if object_path.exists() {
            trace!(oid=%oid.short(), "Object already in database");
            return Ok(oid);
        }

        trace!(oid=%oid.short(), %kind, "Writing object to database");
        self.write_object(&object_path, &content)?;

        Ok(oid)
    }

    fn get(&self, oid: &Digest) -> Result<LoadedObject> {
        let bytes = self.read_to_vec(oid)?;

        if self.verify {
            let actual = Digest::new(&bytes);
            if actual != *oid {
                warn!(expected=%oid, %actual, "Object does not match its address");
                return Err(Error::AddressMismatch {
                    expected: *oid,
                    actual,
                });
            }
        }

        let decoded = codec::decode(&bytes).map_err(|e| Error::CorruptObject {
            oid: *oid,
            reason: e.to_string(),
        })?;

        Ok(LoadedObject {
            kind: decoded.kind,
            payload: decoded.payload.to_vec(),
        })
    }

    fn exists(&self, oid: &Digest) -> bool {
        self.object_path(oid).exists()
    }
}
