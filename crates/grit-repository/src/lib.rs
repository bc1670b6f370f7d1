//! Repository state: the `.git` skeleton, loose refs, and the working
//! tree on either side of it (checkout materializes objects into files,
//! snapshot turns files back into objects).

mod checkout;
mod init;
mod refs;
mod snapshot;

pub use checkout::{checkout_commit, checkout_tree};
pub use snapshot::snapshot_tree;

use std::path::{Path, PathBuf};

use grit_hash::ObjectId;
use grit_object::ObjectType;
use grit_odb::LooseStore;

/// The branch every clone and init points HEAD at.
pub const DEFAULT_BRANCH_REF: &str = "refs/heads/main";

/// An open repository. The root is threaded explicitly; nothing here
/// touches the process working directory.
pub struct Repository {
    root: PathBuf,
    git_dir: PathBuf,
    store: LooseStore,
}

impl Repository {
    /// Open an existing repository rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = root.as_ref().to_path_buf();
        let git_dir = root.join(".git");
        if !git_dir.is_dir() {
            return Err(RepoError::NotARepository(root));
        }
        let store = LooseStore::open(git_dir.join("objects"));
        Ok(Self {
            root,
            git_dir,
            store,
        })
    }

    /// The working tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The loose object store.
    pub fn store(&self) -> &LooseStore {
        &self.store
    }

    /// Read an object that must exist, with its expected kind.
    pub(crate) fn read_required(
        &self,
        oid: &ObjectId,
        expected: ObjectType,
    ) -> Result<Vec<u8>, RepoError> {
        let (obj_type, payload) = self
            .store
            .read(oid)?
            .ok_or(RepoError::ObjectNotFound(*oid))?;
        if obj_type != expected {
            return Err(RepoError::UnexpectedType {
                oid: *oid,
                expected,
                actual: obj_type,
            });
        }
        Ok(payload)
    }
}

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("object {oid} is a {actual}, expected {expected}")]
    UnexpectedType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("invalid ref '{name}': {reason}")]
    InvalidRef { name: String, reason: String },

    #[error(transparent)]
    Store(#[from] grit_odb::StoreError),

    #[error(transparent)]
    Object(#[from] grit_object::ObjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
