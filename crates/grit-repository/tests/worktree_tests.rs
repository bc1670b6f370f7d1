//! Working-tree round trips: checkout materializes what snapshot stored,
//! and snapshotting a checkout reproduces the same tree id.

use std::fs;

use grit_hash::ObjectId;
use grit_object::{Commit, ObjectType, Signature, Tree};
use grit_repository::{checkout_commit, checkout_tree, snapshot_tree, Repository};

fn write_file(path: &std::path::Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn snapshot_of_empty_dir_is_the_empty_tree() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let oid = snapshot_tree(&repo, repo.root()).unwrap();
    assert_eq!(oid.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
}

#[test]
fn snapshot_known_layout_has_stable_id() {
    // Two runs over the same content agree, independent of directory
    // enumeration order.
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    for dir in [dir_a.path(), dir_b.path()] {
        write_file(&dir.join("a").join("b.txt"), b"x");
        write_file(&dir.join("c.txt"), b"");
    }

    let repo_a = Repository::init(dir_a.path()).unwrap();
    let repo_b = Repository::init(dir_b.path()).unwrap();
    let oid_a = snapshot_tree(&repo_a, repo_a.root()).unwrap();
    let oid_b = snapshot_tree(&repo_b, repo_b.root()).unwrap();
    assert_eq!(oid_a, oid_b);

    // The root tree lists "a" (dir) before "c.txt".
    let (_, payload) = repo_a.store().read(&oid_a).unwrap().unwrap();
    let tree = Tree::parse(&payload).unwrap();
    let names: Vec<_> = tree.iter().map(|e| e.name.to_string()).collect();
    assert_eq!(names, ["a", "c.txt"]);
}

#[test]
fn checkout_then_snapshot_is_identity() {
    let src = tempfile::tempdir().unwrap();
    write_file(&src.path().join("hello.txt"), b"hello");
    write_file(&src.path().join("nested").join("inner.txt"), b"inner");
    #[cfg(unix)]
    {
        write_file(&src.path().join("run.sh"), b"#!/bin/sh\n");
        make_executable(&src.path().join("run.sh"));
    }

    let src_repo = Repository::init(src.path()).unwrap();
    let tree_id = snapshot_tree(&src_repo, src_repo.root()).unwrap();

    // Materialize into a second repository sharing no state but the
    // object bytes.
    let dst = tempfile::tempdir().unwrap();
    let dst_repo = Repository::init(dst.path()).unwrap();
    copy_objects(&src_repo, &dst_repo);

    checkout_tree(&dst_repo, &tree_id, dst_repo.root()).unwrap();
    assert_eq!(
        fs::read(dst.path().join("hello.txt")).unwrap(),
        b"hello"
    );
    assert_eq!(
        fs::read(dst.path().join("nested").join("inner.txt")).unwrap(),
        b"inner"
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dst.path().join("run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    let roundtrip = snapshot_tree(&dst_repo, dst_repo.root()).unwrap();
    assert_eq!(roundtrip, tree_id);
}

#[test]
fn checkout_commit_materializes_its_tree() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let blob = repo.store().write(ObjectType::Blob, b"content").unwrap();
    let tree = Tree {
        entries: vec![grit_object::TreeEntry {
            mode: grit_object::FileMode::Regular,
            name: bstr::BString::from("file.txt"),
            oid: blob,
        }],
    };
    let tree_id = repo
        .store()
        .write(ObjectType::Tree, &tree.serialize())
        .unwrap();

    let commit = Commit {
        tree: tree_id,
        parents: Vec::new(),
        author: Signature::new("A", "a@example.com", 1234567890, 0),
        committer: Signature::new("A", "a@example.com", 1234567890, 0),
        extra_headers: Vec::new(),
        message: bstr::BString::from("snapshot\n"),
    };
    let commit_id = repo
        .store()
        .write(ObjectType::Commit, &commit.serialize())
        .unwrap();

    checkout_commit(&repo, &commit_id).unwrap();
    assert_eq!(fs::read(dir.path().join("file.txt")).unwrap(), b"content");
}

#[test]
fn checkout_overwrites_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let blob = repo.store().write(ObjectType::Blob, b"new").unwrap();
    let tree = Tree {
        entries: vec![grit_object::TreeEntry {
            mode: grit_object::FileMode::Regular,
            name: bstr::BString::from("f"),
            oid: blob,
        }],
    };
    let tree_id = repo
        .store()
        .write(ObjectType::Tree, &tree.serialize())
        .unwrap();

    write_file(&dir.path().join("f"), b"old old old");
    checkout_tree(&repo, &tree_id, repo.root()).unwrap();
    assert_eq!(fs::read(dir.path().join("f")).unwrap(), b"new");
}

#[test]
fn checkout_of_missing_object_fails() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let absent = ObjectId::from_hex("00000000000000000000000000000000000000aa").unwrap();
    assert!(checkout_commit(&repo, &absent).is_err());
}

#[cfg(unix)]
#[test]
fn symlinks_survive_the_roundtrip() {
    let src = tempfile::tempdir().unwrap();
    write_file(&src.path().join("target.txt"), b"data");
    std::os::unix::fs::symlink("target.txt", src.path().join("link")).unwrap();

    let src_repo = Repository::init(src.path()).unwrap();
    let tree_id = snapshot_tree(&src_repo, src_repo.root()).unwrap();

    let dst = tempfile::tempdir().unwrap();
    let dst_repo = Repository::init(dst.path()).unwrap();
    copy_objects(&src_repo, &dst_repo);
    checkout_tree(&dst_repo, &tree_id, dst_repo.root()).unwrap();

    let link = dst.path().join("link");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_link(&link).unwrap(),
        std::path::PathBuf::from("target.txt")
    );
    assert_eq!(snapshot_tree(&dst_repo, dst_repo.root()).unwrap(), tree_id);
}

/// Copy every loose object from one store to another, byte for byte.
fn copy_objects(src: &Repository, dst: &Repository) {
    let src_objects = src.git_dir().join("objects");
    let dst_objects = dst.git_dir().join("objects");
    for fan_out in fs::read_dir(&src_objects).unwrap() {
        let fan_out = fan_out.unwrap();
        if !fan_out.file_type().unwrap().is_dir() {
            continue;
        }
        let dst_dir = dst_objects.join(fan_out.file_name());
        fs::create_dir_all(&dst_dir).unwrap();
        for obj in fs::read_dir(fan_out.path()).unwrap() {
            let obj = obj.unwrap();
            fs::copy(obj.path(), dst_dir.join(obj.file_name())).unwrap();
        }
    }
}
