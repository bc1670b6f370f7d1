use std::fs;
use std::path::Path;

use bstr::ByteSlice;
use grit_hash::ObjectId;
use grit_object::{Commit, FileMode, ObjectType, Tree};

use crate::{RepoError, Repository};

/// Materialize the tree of `commit_id` into the repository's working tree.
pub fn checkout_commit(repo: &Repository, commit_id: &ObjectId) -> Result<(), RepoError> {
    let payload = repo.read_required(commit_id, ObjectType::Commit)?;
    let commit = Commit::parse(&payload)?;
    checkout_tree(repo, &commit.tree, repo.root())
}

/// Recursively materialize a tree object into `dir`.
///
/// Directories are created for tree entries, executables get mode 0755,
/// every other file 0644. Symlinks become real symlinks on unix; gitlinks
/// are skipped. Existing files are truncated and overwritten; the walk is
/// not atomic.
pub fn checkout_tree(repo: &Repository, tree_id: &ObjectId, dir: &Path) -> Result<(), RepoError> {
    let payload = repo.read_required(tree_id, ObjectType::Tree)?;
    let tree = Tree::parse(&payload)?;

    for entry in tree.iter() {
        let path = dir.join(entry.name.to_str_lossy().as_ref());

        match entry.mode {
            FileMode::Tree => {
                fs::create_dir_all(&path)?;
                checkout_tree(repo, &entry.oid, &path)?;
            }
            FileMode::Gitlink => {
                eprintln!(
                    "warning: skipping submodule entry '{}'",
                    entry.name.to_str_lossy()
                );
            }
            FileMode::Symlink => {
                let target = repo.read_required(&entry.oid, ObjectType::Blob)?;
                write_symlink(&path, &target)?;
            }
            FileMode::Regular | FileMode::Executable => {
                let data = repo.read_required(&entry.oid, ObjectType::Blob)?;
                fs::write(&path, &data)?;
                set_file_mode(&path, entry.mode == FileMode::Executable)?;
            }
        }
    }

    Ok(())
}

#[cfg(unix)]
fn write_symlink(path: &Path, target: &[u8]) -> Result<(), RepoError> {
    if path.symlink_metadata().is_ok() {
        fs::remove_file(path)?;
    }
    std::os::unix::fs::symlink(target.to_str_lossy().as_ref(), path)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(path: &Path, target: &[u8]) -> Result<(), RepoError> {
    // No symlinks on this host; degrade to a file holding the target path.
    fs::write(path, target)?;
    Ok(())
}

#[cfg(unix)]
fn set_file_mode(path: &Path, executable: bool) -> Result<(), RepoError> {
    use std::os::unix::fs::PermissionsExt;
    let mode = if executable { 0o755 } else { 0o644 };
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path, _executable: bool) -> Result<(), RepoError> {
    Ok(())
}
