use std::fs;
use std::path::Path;

use bstr::BString;
use grit_hash::ObjectId;
use grit_object::{FileMode, ObjectType, Tree, TreeEntry};

use crate::{RepoError, Repository};

/// Store `dir` as a tree object, recursively, and return its id.
///
/// This is the `write-tree` walk: blobs for files (the executable bit
/// selects the mode), symlink targets as mode-120000 blobs, subtrees for
/// directories. `.git` is excluded. Entry order is irrelevant here; the
/// tree serializer sorts canonically.
pub fn snapshot_tree(repo: &Repository, dir: &Path) -> Result<ObjectId, RepoError> {
    let mut entries = Vec::new();

    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        let file_name = dirent.file_name();
        if file_name == ".git" {
            continue;
        }
        let name = BString::from(file_name.to_string_lossy().as_bytes());
        let path = dirent.path();
        let file_type = dirent.file_type()?;

        let (mode, oid) = if file_type.is_dir() {
            (FileMode::Tree, snapshot_tree(repo, &path)?)
        } else if file_type.is_symlink() {
            let target = fs::read_link(&path)?;
            let target_bytes = target.to_string_lossy().into_owned().into_bytes();
            (
                FileMode::Symlink,
                repo.store().write(ObjectType::Blob, &target_bytes)?,
            )
        } else {
            let data = fs::read(&path)?;
            let mode = if is_executable(&dirent.metadata()?) {
                FileMode::Executable
            } else {
                FileMode::Regular
            };
            (mode, repo.store().write(ObjectType::Blob, &data)?)
        };

        entries.push(TreeEntry { mode, name, oid });
    }

    let tree = Tree { entries };
    Ok(repo.store().write(ObjectType::Tree, &tree.serialize())?)
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}
