use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use crate::cat_file::ObjectRef;
use crate::digest::Digest;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init,

    /// Provide content or type and size information for repository objects
    #[clap(subcommand)]
    CatFile(CatFile),

    /// Compute the address of files as blobs, optionally storing them
    HashObject {
        /// Actually write the objects into the object database
        #[clap(short)]
        write: bool,

        #[clap(required = true)]
        files: Vec<Utf8PathBuf>,
    },

    /// List the contents of a tree object
    LsTree {
        /// List only filenames
        #[clap(long)]
        name_only: bool,

        /// Recurse into sub-trees
        #[clap(short)]
        recursive: bool,

        #[clap(value_name = "tree-ish")]
        object: ObjectRef,
    },

    /// Create a tree object from the working directory
    WriteTree {
        /// Compute the tree address without writing any objects
        #[clap(long)]
        dry_run: bool,
    },

    /// Create a new commit object
    CommitTree {
        #[clap(value_name = "tree")]
        tree: Digest,

        /// Parent commit
        #[clap(short, value_name = "parent")]
        parent: Option<Digest>,

        /// Commit message
        #[clap(short, long)]
        message: String,

        #[clap(long, env = "PLUMB_AUTHOR_NAME", default_value = "nik")]
        name: String,

        #[clap(long, env = "PLUMB_AUTHOR_EMAIL", default_value = "nik@example.com")]
        email: String,

        /// Timezone offset of the commit, as +HHMM or -HHMM. Defaults to the local offset
        #[clap(long, env = "PLUMB_TIMEZONE", allow_hyphen_values = true)]
        timezone: Option<String>,
    },
}

// FIXME: This is exposing the full names of the subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum CatFile {
    /// Exit with status `ExitCode::SUCCESS` if `object` exists and is a valid object. If
    /// `object` is of an invalid format, exit with status `ExitCode::FAILURE`, and print an
    /// error to stderr.
    #[clap(short_flag = 'e')]
    Exists {
        #[clap(value_name = "object")]
        object: ObjectRef,
    },

    /// Pretty-print the contents of `object` based on its type
    #[clap(short_flag = 'p')]
    PrettyPrint {
        #[clap(value_name = "object")]
        object: ObjectRef,
    },

    /// Print the type of `object` to stdout
    #[clap(short_flag = 't')]
    Type {
        #[clap(value_name = "object")]
        object: ObjectRef,
    },

    /// Print the size of `object` to stdout
    #[clap(short_flag = 's')]
    Size {
        #[clap(value_name = "object")]
        object: ObjectRef,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "plumb", about = "A content-addressable object store")]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// Log at debug level when RUST_LOG is unset
    #[clap(short, long)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[clap(short = 'C', env = "PLUMB_DIR")]
    pub path: Option<Utf8PathBuf>,

    /// Check that every object read hashes to the address it is stored under
    #[clap(long, env = "PLUMB_VERIFY_OBJECTS")]
    pub verify_objects: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plumbing_commands() {
        let opt = Opt::try_parse_from([
            "plumb",
            "cat-file",
            "-p",
            "45b983be36b73c0788dc9cbcb76cbb80fc7bb057:b/c.txt",
        ])
        .unwrap();
        assert!(matches!(
            opt.command,
            Command::CatFile(CatFile::PrettyPrint { ref object }) if object.path.is_some()
        ));

        let opt = Opt::try_parse_from(["plumb", "hash-object", "-w", "a", "b"]).unwrap();
        assert!(matches!(
            opt.command,
            Command::HashObject { write: true, ref files } if files.len() == 2
        ));

        let opt = Opt::try_parse_from([
            "plumb",
            "commit-tree",
            "45b983be36b73c0788dc9cbcb76cbb80fc7bb057",
            "-m",
            "hello",
            "--timezone",
            "-0700",
        ])
        .unwrap();
        match opt.command {
            Command::CommitTree {
                parent,
                message,
                timezone,
                ..
            } => {
                assert_eq!(parent, None);
                assert_eq!(message, "hello");
                assert_eq!(timezone.as_deref(), Some("-0700"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(Opt::try_parse_from(["plumb", "cat-file", "-p", "abc"]).is_err());
        assert!(Opt::try_parse_from(["plumb", "ls-tree", "not-hex"]).is_err());
    }
}
