use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::database::ObjectStore;
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::interface::CatFile;
use crate::storable::ObjectKind;
use crate::tree::{resolve_path, ListOptions, TreeListing};

/// An object named either by its full address or as `<tree address>:<path inside the tree>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRef {
    pub oid: Digest,
    pub path: Option<Utf8PathBuf>,
}

impl ObjectRef {
    pub fn resolve<S: ObjectStore>(&self, store: &S) -> Result<Digest> {
        match &self.path {
            Some(path) => resolve_path(store, &self.oid, path),
            None => Ok(self.oid),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (oid, path) = match s.split_once(':') {
            Some((oid, path)) => (oid, Some(Utf8PathBuf::from(path))),
            None => (s, None),
        };
        let oid = Digest::from_str(oid)
            .map_err(|e| Error::Usage(format!("invalid object name '{oid}': {e}")))?;
        Ok(Self { oid, path })
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}", self.oid, path),
            None => write!(f, "{}", self.oid),
        }
    }
}

/// Write the contents of `object` to `out`: a blob's raw bytes, or a tree's listing.
pub fn pretty_print<S: ObjectStore>(store: &S, object: &ObjectRef, out: &mut impl Write) -> Result<()> {
    let oid = object.resolve(store)?;
    let loaded = store.get(&oid)?;
    debug!(%object, kind=%loaded.kind, "Pretty-printing object");

    let io_err = |source: std::io::Error| Error::Io {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    };

    match loaded.kind {
        ObjectKind::Blob => out.write_all(&loaded.payload).map_err(io_err)?,
        ObjectKind::Tree => {
            for line in TreeListing::from_payload(store, loaded.payload, ListOptions::default()) {
                writeln!(out, "{}", line?).map_err(io_err)?;
            }
        }
        kind => return Err(Error::UnsupportedType { oid, kind }),
    }
    out.flush().map_err(io_err)
}

pub fn handle<S: ObjectStore>(store: &S, args: &CatFile, out: &mut impl Write) -> Result<()> {
    let io_err = |source: std::io::Error| Error::Io {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    };

    match args {
        CatFile::Exists { object } => {
            let oid = object.resolve(store)?;
            if !store.exists(&oid) {
                return Err(Error::NotFound(oid));
            }
            // Fails if the object is corrupt.
            store.get(&oid)?;
            Ok(())
        }
        CatFile::PrettyPrint { object } => pretty_print(store, object, out),
        CatFile::Type { object } => {
            let loaded = store.get(&object.resolve(store)?)?;
            writeln!(out, "{}", loaded.kind).map_err(io_err)
        }
        CatFile::Size { object } => {
            let loaded = store.get(&object.resolve(store)?)?;
            writeln!(out, "{}", loaded.payload.len()).map_err(io_err)
        }
    }
}
