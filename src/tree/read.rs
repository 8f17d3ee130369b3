use bstr::BString;
use camino::{Utf8Component, Utf8Path};
use tracing::trace;

use crate::database::ObjectStore;
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::storable::tree::{Tree, TreeEntry};
use crate::storable::ObjectKind;

#[derive(Clone, Copy, Debug, Default)]
pub struct ListOptions {
    /// Print only entry names.
    pub names_only: bool,
    /// Descend into sub-trees, printing only their non-tree entries with a slash-joined path.
    pub recursive: bool,
}

/// Load `oid` and check that it is a tree.
pub fn load_tree_payload<S: ObjectStore>(store: &S, oid: &Digest) -> Result<Vec<u8>> {
    let object = store.get(oid)?;
    if object.kind != ObjectKind::Tree {
        return Err(Error::UnsupportedType {
            oid: *oid,
            kind: object.kind,
        });
    }
    Ok(object.payload)
}

struct Frame {
    prefix: BString,
    payload: Vec<u8>,
    offset: usize,
}

/// The formatted lines of a tree, produced lazily.
///
/// Entries are decoded one at a time; a malformed entry yields an error and ends the listing. With
/// [`ListOptions::recursive`], sub-trees are loaded from the store only when the walk reaches them.
pub struct TreeListing<'s, S> {
    store: &'s S,
    options: ListOptions,
    pending: Vec<Frame>,
    failed: bool,
}

pub fn list_tree<'s, S: ObjectStore>(
    store: &'s S,
    oid: &Digest,
    options: ListOptions,
) -> Result<TreeListing<'s, S>> {
    let payload = load_tree_payload(store, oid)?;
    Ok(TreeListing::from_payload(store, payload, options))
}

impl<'s, S: ObjectStore> TreeListing<'s, S> {
    /// List an already loaded tree payload.
    pub fn from_payload(store: &'s S, payload: Vec<u8>, options: ListOptions) -> Self {
        Self {
            store,
            options,
            pending: vec![Frame {
                prefix: BString::default(),
                payload,
                offset: 0,
            }],
            failed: false,
        }
    }

    fn format(&self, entry: &TreeEntry, path: &BString) -> String {
        if self.options.names_only {
            path.to_string()
        } else {
            format!(
                "{:06o} {} {}\t{}",
                entry.mode(),
                entry.mode().object_kind(),
                entry.oid(),
                path
            )
        }
    }

    fn fail(&mut self, e: Error) -> Option<Result<String>> {
        self.failed = true;
        Some(Err(e))
    }
}

impl<S: ObjectStore> Iterator for TreeListing<'_, S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let (entry, path) = {
                let frame = self.pending.last_mut()?;
                if frame.offset >= frame.payload.len() {
                    self.pending.pop();
                    continue;
                }
                let (entry, consumed) = match TreeEntry::parse(&frame.payload[frame.offset..]) {
                    Ok(parsed) => parsed,
                    Err(e) => return self.fail(e),
                };
                frame.offset += consumed;

                let mut path = frame.prefix.clone();
                path.extend_from_slice(entry.name());
                (entry, path)
            };

            if self.options.recursive && entry.mode().is_dir() {
                trace!(tree=%entry.oid().short(), path=%path, "Descending into subtree");
                let payload = match load_tree_payload(self.store, entry.oid()) {
                    Ok(payload) => payload,
                    Err(e) => return self.fail(e),
                };
                let mut prefix = path;
                prefix.push(b'/');
                self.pending.push(Frame {
                    prefix,
                    payload,
                    offset: 0,
                });
                continue;
            }

            return Some(Ok(self.format(&entry, &path)));
        }
    }
}

/// Follow `path` from the tree `root` and return the address of the object it names.
pub fn resolve_path<S: ObjectStore>(store: &S, root: &Digest, path: &Utf8Path) -> Result<Digest> {
    let not_found = || Error::PathNotFound {
        tree: *root,
        path: path.to_owned(),
    };

    let mut current = *root;
    for component in path.components() {
        let name = match component {
            Utf8Component::Normal(name) => name,
            Utf8Component::CurDir => continue,
            _ => return Err(not_found()),
        };
        let tree = Tree::parse(&load_tree_payload(store, &current)?)?;
        current = *tree.get(name.as_bytes()).ok_or_else(not_found)?.oid();
    }
    Ok(current)
}
