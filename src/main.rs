#[cfg(test)]
mod test;

mod cat_file;
mod database;
mod digest;
mod error;
mod filemode;
mod interface;
mod repo;
mod storable;
mod timestamp;
mod tree;
mod util;

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::Context;
pub use color_eyre::Result;

use crate::interface::*;
use crate::repo::Repo;
use crate::storable::commit::Identity;
use crate::tree::ListOptions;

use clap::CommandFactory;
use clap::Parser;
use once_cell::sync::Lazy;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static ARGS: Lazy<Opt> = Lazy::new(Opt::parse);

fn main() -> Result<()> {
    color_eyre::install()?;

    Lazy::force(&ARGS);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if ARGS.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&ARGS) {
        Err(e) if is_usage_error(&e) => {
            // Usage errors get the help text instead of a diagnostic.
            Opt::command().print_help()?;
            std::process::exit(1);
        }
        other => other,
    }
}

fn is_usage_error(e: &color_eyre::Report) -> bool {
    e.downcast_ref::<error::Error>()
        .map_or(false, error::Error::is_usage)
}

fn run(args: &Opt) -> Result<()> {
    let path = match args.path {
        Some(ref path) => canonical(path).wrap_err(format!("Directory not found: '{path}'"))?,
        None => canonical(Utf8PathBuf::try_from(std::env::current_dir()?)?.as_path())?,
    };

    if matches!(args.command, Command::Init) {
        let repo = Repo::init(&path)?;
        println!("Initialized empty repository in {}", repo.git_dir());
        return Ok(());
    }

    let repo = Repo::open(&path)?.verify_objects(args.verify_objects);
    let mut stdout = std::io::stdout().lock();

    match &args.command {
        Command::Init => unreachable!(),
        Command::CatFile(cat_file) => cat_file::handle(&repo.database, cat_file, &mut stdout)?,
        Command::HashObject { write, files } => {
            for oid in repo.hash_objects(files, *write)? {
                writeln!(stdout, "{oid:x}")?;
            }
        }
        Command::LsTree {
            name_only,
            recursive,
            object,
        } => {
            let oid = object.resolve(&repo.database)?;
            let options = ListOptions {
                names_only: *name_only,
                recursive: *recursive,
            };
            for line in repo.ls_tree(&oid, options)? {
                writeln!(stdout, "{}", line?)?;
            }
        }
        Command::WriteTree { dry_run } => {
            let oid = repo.write_tree(!dry_run)?;
            writeln!(stdout, "{oid:x}")?;
        }
        Command::CommitTree {
            tree,
            parent,
            message,
            name,
            email,
            timezone,
        } => {
            let commit_id = repo.commit_tree(
                *tree,
                *parent,
                Identity::new(name, email),
                message,
                timezone.as_deref(),
            )?;
            writeln!(stdout, "{commit_id:x}")?;
        }
    }
    Ok(())
}

fn canonical(path: &Utf8Path) -> Result<Utf8PathBuf> {
    Ok(Utf8PathBuf::try_from(path.canonicalize()?)?)
}
