mod commit;

use camino::{Utf8Path, Utf8PathBuf};
use tempdir::TempDir;

use crate::repo::Repo;

pub const COMMIT_NAME: &str = "nik";
pub const COMMIT_EMAIL: &str = "nik@example.com";

/// Create each file under `$root` with `"<path>-contents\n"` as its contents.
#[macro_export]
macro_rules! create_test_files {
    ($root:ident, [$($path:literal),*]) => {{
        use std::io::Write;
        $({
            let path = $root.join($path);
            std::fs::create_dir_all(path.parent().unwrap())?;
            writeln!(
                std::fs::File::create(&path)?,
                concat!($path, "-contents")
                )?;
        })*
    }};
}

/// A fresh repository in a temporary directory. The directory lives as long as the guard.
pub fn temp_repo() -> color_eyre::Result<(TempDir, Utf8PathBuf, Repo)> {
    let dir = TempDir::new("plumb")?;
    let root = Utf8PathBuf::try_from(dir.path().canonicalize()?)?;
    let repo = Repo::init(&root)?;
    Ok((dir, root, repo))
}

/// Every file below the repository's objects directory.
pub fn object_files(repo: &Repo) -> Vec<Utf8PathBuf> {
    walkdir::WalkDir::new(repo.database.root())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
        .collect()
}

pub fn read_object(repo: &Repo, path: &Utf8Path) -> Vec<u8> {
    use std::io::Read;
    let compressed = std::fs::read(repo.database.root().join(path)).unwrap();
    let mut raw = Vec::new();
    flate2::read::ZlibDecoder::new(&*compressed)
        .read_to_end(&mut raw)
        .unwrap();
    raw
}
