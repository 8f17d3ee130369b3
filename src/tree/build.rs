use std::fs::FileType;
use std::os::unix::fs::PermissionsExt;

use camino::Utf8Path;
use tracing::*;
use walkdir::WalkDir;

use crate::database::ObjectStore;
use crate::digest::Digest;
use crate::error::{Error, Result, WithPath};
use crate::filemode::FileMode;
use crate::storable::blob::Blob;
use crate::storable::tree::{Tree, TreeEntry};

/// Decides whether a directory entry, given its name and type, takes part in a snapshot.
pub type EntryFilter = fn(&str, &FileType) -> bool;

/// Skips dotfiles (which includes the repository's own metadata directory) and anything that is
/// neither a regular file nor a directory.
pub fn default_filter(name: &str, file_type: &FileType) -> bool {
    !name.starts_with('.') && (file_type.is_file() || file_type.is_dir())
}

/// Snapshots a directory into tree and blob objects.
///
/// Trees are built post-order: every child object is stored before the tree that references it.
/// Entries are ordered by file name, compared as raw bytes.
pub struct TreeBuilder<'s, S> {
    store: &'s S,
    filter: EntryFilter,
    persist: bool,
}

impl<'s, S: ObjectStore> TreeBuilder<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            filter: default_filter,
            persist: true,
        }
    }

    /// When false, addresses are computed but nothing is written to the store.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(&self, dir: &Utf8Path) -> Result<Digest> {
        trace!(%dir, "Building tree");
        let mut tree = Tree::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            let name = entry.file_name().to_str().ok_or_else(|| Error::Io {
                path: dir.join(entry.file_name().to_string_lossy().as_ref()),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "file name is not valid unicode",
                ),
            })?;
            let file_type = entry.file_type();

            if !(self.filter)(name, &file_type) {
                trace!(%name, "Skipping entry");
                continue;
            }

            let path = dir.join(name);
            if file_type.is_dir() {
                trace!(%path, "Recursing into subtree");
                let oid = self.build(&path)?;
                tree.push(TreeEntry::new(FileMode::DIRECTORY, name, oid));
            } else if file_type.is_file() {
                let data = std::fs::read(&path).with_path(&path)?;
                let metadata = entry
                    .metadata()
                    .map_err(|e| walk_error(dir, e))?;
                let mode = FileMode::file(metadata.permissions().mode());
                let oid = self.store.store(&Blob::new(data), self.persist)?;
                trace!(%path, oid=%oid.short(), ?mode, "Stored blob");
                tree.push(TreeEntry::new(mode, name, oid));
            } else {
                trace!(%path, "Skipping entry that is neither a file nor a directory");
            }
        }

        let oid = self.store.store(&tree, self.persist)?;
        debug!(%dir, oid=%oid.short(), entries = tree.entries().len(), "Built tree");
        Ok(oid)
    }
}

fn walk_error(dir: &Utf8Path, e: walkdir::Error) -> Error {
    let path = e
        .path()
        .and_then(Utf8Path::from_path)
        .map(Utf8Path::to_owned)
        .unwrap_or_else(|| dir.to_owned());
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
    Error::Io { path, source }
}

/// Convenience wrapper: snapshot `dir` with the default filter.
pub fn build_tree<S: ObjectStore>(store: &S, dir: &Utf8Path, persist: bool) -> Result<Digest> {
    TreeBuilder::new(store).persist(persist).build(dir)
}
