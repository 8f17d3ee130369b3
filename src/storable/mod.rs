pub mod blob;
pub mod codec;
pub mod commit;
pub mod tree;

use std::borrow::Cow;
use std::fmt::Display;

use crate::digest::Digest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"blob" => Some(ObjectKind::Blob),
            b"tree" => Some(ObjectKind::Tree),
            b"commit" => Some(ObjectKind::Commit),
            _ => None,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Storable {
    const KIND: ObjectKind;

    /// The kind-specific payload, without the `"{type} {len}\0"` header.
    fn payload(&self) -> Cow<'_, [u8]>;

    /// Returns the storable uncompressed but formatted `"{type} {len}\0{data}"`.
    /// e.g.
    /// a blob `"hello\n"` becomes `"blob 6\0hello\n"`
    fn formatted(&self) -> Vec<u8> {
        codec::encode(Self::KIND, &self.payload())
    }

    fn oid(&self) -> Digest {
        Digest::new(&self.formatted())
    }
}
