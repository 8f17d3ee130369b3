use std::borrow::Cow;

use tracing::debug;

use super::{ObjectKind, Storable};
use crate::database::ObjectStore;
use crate::digest::Digest;
use crate::error::Result;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

pub struct Commit {
    tree_id: Digest,
    parent: Option<Digest>,
    author: Identity,
    when: Timestamp,
    message: String,
}

impl Commit {
    /// A non-empty `message` always ends up newline-terminated.
    pub fn new(
        tree_id: Digest,
        parent: Option<Digest>,
        author: Identity,
        when: Timestamp,
        message: &str,
    ) -> Self {
        let mut message = message.to_owned();
        if !message.is_empty() && !message.ends_with('\n') {
            message.push('\n');
        }

        Commit {
            tree_id,
            parent,
            author,
            when,
            message,
        }
    }
}

impl Storable for Commit {
    const KIND: ObjectKind = ObjectKind::Commit;

    fn payload(&self) -> Cow<'_, [u8]> {
        let data = format!(
            "\
            tree {}\n\
            {}\
            author {} <{}> {}\n\
            committer {} <{}> {}\n\
            \n\
            {}",
            self.tree_id.to_hex(),
            match &self.parent {
                Some(parent) => format!("parent {parent:x}\n"),
                None => "".into(),
            },
            self.author.name,
            self.author.email,
            self.when,
            self.author.name,
            self.author.email,
            self.when,
            self.message
        );
        Cow::Owned(data.into_bytes())
    }
}

/// Wrap `tree` in a commit object and store it.
///
/// Neither `tree` nor `parent` is checked for existence; a dangling reference only shows up when
/// it is read.
pub fn build_commit<S: ObjectStore>(
    store: &S,
    tree: Digest,
    parent: Option<Digest>,
    author: Identity,
    message: &str,
    when: Timestamp,
    persist: bool,
) -> Result<Digest> {
    let commit = Commit::new(tree, parent, author, when, message);
    let oid = store.store(&commit, persist)?;
    debug!(commit = %oid.short(), tree = %tree.short(), persist, "Built commit");
    Ok(oid)
}
