use camino::{Utf8Path, Utf8PathBuf};

use crate::digest::Digest;
use crate::storable::ObjectKind;

/// Failures reported by the object store and the operations built on it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filesystem or stream operation failed.
    #[error("{path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes do not follow the canonical encoding of an object.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("object not found: {0}")]
    NotFound(Digest),

    /// The object file exists but could not be decompressed or decoded.
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: Digest, reason: String },

    /// The operation does not apply to objects of this kind.
    #[error("unsupported object type for {oid}: {kind}")]
    UnsupportedType { oid: Digest, kind: ObjectKind },

    /// Only raised when read verification is enabled.
    #[error("object stored as {expected} hashes to {actual}")]
    AddressMismatch { expected: Digest, actual: Digest },

    #[error("path '{path}' does not exist in tree {tree}")]
    PathNotFound { tree: Digest, path: Utf8PathBuf },

    #[error("not a repository (or any of the parent directories): {0}")]
    NotARepository(Utf8PathBuf),

    /// The arguments were structurally invalid. The CLI prints its own usage text for these.
    #[error("{0}")]
    Usage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attach the offending path to an I/O error.
pub trait WithPath<T> {
    fn with_path(self, path: impl AsRef<Utf8Path>) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: impl AsRef<Utf8Path>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.as_ref().to_owned(),
            source,
        })
    }
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedObject(reason.into())
    }

    /// Returns `true` if this is a [`Usage`] error.
    ///
    /// [`Usage`]: Error::Usage
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(..))
    }
}
