use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use tracing::*;

use crate::database::{Database, ObjectStore};
use crate::digest::Digest;
use crate::error::{Error, Result, WithPath};
use crate::storable::blob::Blob;
use crate::storable::commit::{build_commit, Identity};
use crate::timestamp::{self, Timestamp};
use crate::tree::{list_tree, ListOptions, TreeBuilder, TreeListing};

pub const GIT_DIR: &str = ".git";
const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

pub struct Repo {
    dir: Utf8PathBuf,
    git_dir: Utf8PathBuf,
    pub database: Database,
}

impl Repo {
    fn at(dir: Utf8PathBuf) -> Self {
        let git_dir = dir.join(GIT_DIR);
        let database = Database::new(&git_dir);
        trace!(path=%dir, "Opened repo");
        Self {
            dir,
            git_dir,
            database,
        }
    }

    /// Create the metadata directory skeleton: `objects`, `refs`, and a `HEAD` naming the current
    /// branch. An existing repository is left untouched.
    pub fn init(dir: &Utf8Path) -> Result<Self> {
        let repo = Self::at(dir.to_owned());
        trace!(path=%repo.dir, "Initialising repo");
        if repo.git_dir.exists() {
            warn!("Repo already exists, init will do nothing");
            return Ok(repo);
        }
        for d in ["objects", "refs"] {
            let path = repo.git_dir.join(d);
            trace!(%path, "Creating directory");
            std::fs::create_dir_all(&path).with_path(&path)?;
        }
        let head = repo.git_dir.join("HEAD");
        std::fs::write(&head, DEFAULT_HEAD).with_path(&head)?;
        Ok(repo)
    }

    /// Find the repository containing `path`, searching upwards.
    pub fn open(path: &Utf8Path) -> Result<Self> {
        for dir in path.ancestors() {
            let git_dir = dir.join(GIT_DIR);
            if git_dir.join("objects").is_dir() && git_dir.join("refs").is_dir() {
                return Ok(Self::at(dir.to_owned()));
            }
        }
        Err(Error::NotARepository(path.to_owned()))
    }

    pub fn verify_objects(mut self, verify: bool) -> Self {
        self.database = self.database.verify_reads(verify);
        self
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn git_dir(&self) -> &Utf8Path {
        &self.git_dir
    }

    /// Hash each file as a blob, in parallel. The addresses are returned in the order of `paths`.
    pub fn hash_objects(&self, paths: &[Utf8PathBuf], persist: bool) -> Result<Vec<Digest>> {
        paths
            .par_iter()
            .map(|path| -> Result<Digest> {
                let path = self.dir.join(path);
                let data = std::fs::read(&path).with_path(&path)?;
                let oid = self.database.store(&Blob::new(data), persist)?;
                trace!(%path, oid=%oid.short(), persist, "Hashed file");
                Ok(oid)
            })
            .collect()
    }

    /// Snapshot the working directory.
    pub fn write_tree(&self, persist: bool) -> Result<Digest> {
        TreeBuilder::new(&self.database)
            .persist(persist)
            .build(&self.dir)
    }

    pub fn commit_tree(
        &self,
        tree: Digest,
        parent: Option<Digest>,
        author: Identity,
        message: &str,
        timezone: Option<&str>,
    ) -> Result<Digest> {
        if message.is_empty() {
            return Err(Error::Usage("a commit message is required".to_owned()));
        }
        let when = match timezone {
            Some(offset) => Timestamp::now_in(timestamp::parse_offset(offset)?),
            None => Timestamp::now(),
        };
        build_commit(&self.database, tree, parent, author, message, when, true)
    }

    pub fn ls_tree(&self, tree: &Digest, options: ListOptions) -> Result<TreeListing<'_, Database>> {
        list_tree(&self.database, tree, options)
    }
}
