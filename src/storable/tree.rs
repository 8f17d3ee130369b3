use std::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};

use super::{ObjectKind, Storable};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::filemode::FileMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: BString,
    oid: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &BStr {
        self.name.as_bstr()
    }

    pub fn oid(&self) -> &Digest {
        &self.oid
    }

    /// Parses the entry at the start of `bytes`. Entries are of the form
    /// `<mode> <name>\0<20 byte oid>`.
    ///
    /// Returns the entry and the number of bytes it occupied.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize)> {
        let space_idx = memchr::memchr(b' ', bytes)
            .ok_or_else(|| Error::malformed("tree entry has no mode terminator"))?;
        let mode = FileMode::parse(&bytes[..space_idx])?;

        let rest = &bytes[space_idx + 1..];
        let nul_idx = memchr::memchr(b'\0', rest)
            .ok_or_else(|| Error::malformed("tree entry has no name terminator"))?;
        let name = &rest[..nul_idx];

        let oid_start = nul_idx + 1;
        let oid = rest
            .get(oid_start..oid_start + Digest::LEN)
            .and_then(Digest::from_slice)
            .ok_or_else(|| {
                Error::malformed(format!(
                    "tree entry '{}' is truncated before its address",
                    name.as_bstr()
                ))
            })?;

        let consumed = space_idx + 1 + oid_start + Digest::LEN;
        Ok((Self::new(mode, name, oid), consumed))
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("{:06o}", self.mode).as_bytes());
        out.push(b' ');
        out.extend_from_slice(&self.name);
        out.push(b'\0');
        out.extend_from_slice(&*self.oid);
    }
}

/// A tree's entries, kept in insertion order.
///
/// Entries are never sorted: the order is whatever the producer appended, so two trees with the
/// same entries in a different order have different addresses.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let entries = TreeEntries::new(bytes).collect::<Result<_>>()?;
        Ok(Self { entries })
    }
}

impl Storable for Tree {
    const KIND: ObjectKind = ObjectKind::Tree;

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut data = Vec::new();
        for entry in &self.entries {
            entry.write_to(&mut data);
        }
        Cow::Owned(data)
    }
}

/// Lazily parses the entries of a tree payload. Stops after the first error.
pub struct TreeEntries<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> TreeEntries<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            rest: payload,
            failed: false,
        }
    }
}

impl Iterator for TreeEntries<'_> {
    type Item = Result<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match TreeEntry::parse(self.rest) {
            Ok((entry, consumed)) => {
                self.rest = &self.rest[consumed..];
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
