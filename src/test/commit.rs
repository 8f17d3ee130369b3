use std::str::FromStr;

use pretty_assertions::assert_eq;

use crate::database::ObjectStore;
use crate::digest::Digest;
use crate::error::Error;
use crate::storable::commit::Identity;
use crate::storable::ObjectKind;
use crate::test::{temp_repo, COMMIT_EMAIL, COMMIT_NAME};
use crate::Result;

#[test]
/// Snapshot a directory and commit it. The commit text should reference the tree, carry no
/// parent, and end with the newline-terminated message.
fn commit_snapshot() -> Result<()> {
    let (_dir, root, repo) = temp_repo()?;
    crate::create_test_files!(root, ["file1", "file2"]);

    let tree_id = repo.write_tree(true)?;
    let commit_id = repo.commit_tree(
        tree_id,
        None,
        Identity::new(COMMIT_NAME, COMMIT_EMAIL),
        "hello",
        Some("+0000"),
    )?;

    let commit = repo.database.get(&commit_id)?;
    assert_eq!(commit.kind, ObjectKind::Commit);
    let text = String::from_utf8(commit.payload)?;
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], format!("tree {tree_id:x}"));
    assert!(lines[1].starts_with("author nik <nik@example.com> "));
    assert!(lines[1].ends_with(" +0000"));
    assert!(lines[2].starts_with("committer nik <nik@example.com> "));
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "hello");
    assert!(text.ends_with("\n\nhello\n"));
    assert!(!text.contains("\nparent "));

    Ok(())
}

#[test]
fn commit_with_parent() -> Result<()> {
    let (_dir, _root, repo) = temp_repo()?;
    let tree_id = repo.write_tree(true)?;
    let author = Identity::new(COMMIT_NAME, COMMIT_EMAIL);

    let first = repo.commit_tree(tree_id, None, author.clone(), "first\n", None)?;
    let second = repo.commit_tree(tree_id, Some(first), author, "second", Some("-0700"))?;

    let text = String::from_utf8(repo.database.get(&second)?.payload)?;
    assert_eq!(text.lines().nth(1), Some(format!("parent {first:x}").as_str()));
    assert!(text.contains(" -0700\ncommitter "));
    assert!(text.ends_with("\n\nsecond\n"));

    Ok(())
}

#[test]
fn commit_does_not_check_references() -> Result<()> {
    let (_dir, _root, repo) = temp_repo()?;
    let dangling = Digest::from_str("0123456789abcdef0123456789abcdef01234567")?;

    let commit_id = repo.commit_tree(
        dangling,
        Some(dangling),
        Identity::new(COMMIT_NAME, COMMIT_EMAIL),
        "optimistic",
        None,
    )?;
    assert!(repo.database.exists(&commit_id));
    assert!(!repo.database.exists(&dangling));

    Ok(())
}

#[test]
fn commit_argument_errors_are_usage_errors() -> Result<()> {
    let (_dir, _root, repo) = temp_repo()?;
    let tree_id = repo.write_tree(true)?;
    let author = Identity::new(COMMIT_NAME, COMMIT_EMAIL);

    assert!(matches!(
        repo.commit_tree(tree_id, None, author.clone(), "", None),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        repo.commit_tree(tree_id, None, author, "msg", Some("PST")),
        Err(Error::Usage(_))
    ));

    Ok(())
}
