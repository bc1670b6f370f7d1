use std::fs;
use std::path::Path;

use crate::{RepoError, Repository, DEFAULT_BRANCH_REF};

impl Repository {
    /// Initialize a repository at `root`, creating the skeleton:
    ///
    /// ```text
    /// .git/
    ///   HEAD              "ref: refs/heads/main\n"
    ///   objects/
    ///   refs/heads/
    /// ```
    ///
    /// Re-running init on an existing repository is a safe no-op; existing
    /// data is never overwritten.
    pub fn init(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = root.as_ref();
        let git_dir = root.join(".git");

        if !git_dir.join("HEAD").is_file() {
            fs::create_dir_all(git_dir.join("objects"))?;
            fs::create_dir_all(git_dir.join("refs").join("heads"))?;
            fs::write(git_dir.join("HEAD"), format!("ref: {DEFAULT_BRANCH_REF}\n"))?;
        }

        Self::open(root)
    }
}
