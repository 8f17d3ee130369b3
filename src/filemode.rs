use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::storable::ObjectKind;

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Octal::fmt(&self.0, f)
    }
}

impl Debug for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FileMode({:06o})", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const FILE: FileMode = FileMode(0o100000);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const REGULAR: FileMode = FileMode(0o100644);

    const PERMISSION_BITS: u32 = 0o777;

    /// The mode of a regular file with the given `st_mode` permission bits. Setuid, setgid and
    /// sticky bits are not recorded.
    pub fn file(st_mode: u32) -> Self {
        FileMode(Self::FILE.0 | (st_mode & Self::PERMISSION_BITS))
    }

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIRECTORY.0 != 0
    }

    /// The kind of object an entry with this mode refers to. Only the directory bit is consulted.
    pub fn object_kind(self) -> ObjectKind {
        if self.is_dir() {
            ObjectKind::Tree
        } else {
            ObjectKind::Blob
        }
    }

    /// Parse the octal mode field of a tree entry.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let invalid = || {
            Error::malformed(format!(
                "invalid mode '{}' in tree entry",
                String::from_utf8_lossy(bytes)
            ))
        };
        if bytes.is_empty() || !bytes.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Err(invalid());
        }
        let mode = std::str::from_utf8(bytes).map_err(|_| invalid())?;
        u32::from_str_radix(mode, 8)
            .map(FileMode)
            .map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_mode_merges_permissions() {
        assert_eq!(FileMode::file(0o100644), FileMode::REGULAR);
        assert_eq!(FileMode::file(0o755), FileMode::EXECUTABLE);
        assert_eq!(format!("{:06o}", FileMode::file(0o4755)), "100755");
        assert_eq!(FileMode::file(0o101777), FileMode(0o100777));
        assert_eq!(format!("{:06o}", FileMode::DIRECTORY), "040000");
    }

    #[test]
    fn kind_from_directory_bit() {
        assert_eq!(FileMode::DIRECTORY.object_kind(), ObjectKind::Tree);
        assert_eq!(FileMode::REGULAR.object_kind(), ObjectKind::Blob);
        assert_eq!(FileMode(0o120000).object_kind(), ObjectKind::Blob);
    }

    #[test]
    fn parse_mode() {
        assert_eq!(FileMode::parse(b"40000").unwrap(), FileMode::DIRECTORY);
        assert_eq!(FileMode::parse(b"040000").unwrap(), FileMode::DIRECTORY);
        assert_eq!(FileMode::parse(b"100644").unwrap(), FileMode::REGULAR);
        for bad in [&b""[..], b"100648", b"10x644", b" 100644", b"-1"] {
            assert!(matches!(FileMode::parse(bad), Err(Error::MalformedObject(_))));
        }
    }
}
