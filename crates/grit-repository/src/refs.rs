use std::fs;

use grit_hash::ObjectId;

use crate::{RepoError, Repository};

impl Repository {
    /// Write a loose ref as `<40-hex>\n`, rewriting the file in full.
    pub fn write_ref(&self, name: &str, oid: &ObjectId) -> Result<(), RepoError> {
        let path = self.ref_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("{}\n", oid.to_hex()))?;
        Ok(())
    }

    /// Read a loose ref. Returns `None` when the ref file does not exist.
    pub fn read_ref(&self, name: &str) -> Result<Option<ObjectId>, RepoError> {
        let path = self.ref_path(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::Io(e)),
        };
        let oid = ObjectId::from_hex(content.trim()).map_err(|e| RepoError::InvalidRef {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(oid))
    }

    /// Point `HEAD` at a branch ref: `ref: <target>\n`.
    pub fn write_head_symref(&self, target: &str) -> Result<(), RepoError> {
        fs::write(self.git_dir().join("HEAD"), format!("ref: {target}\n"))?;
        Ok(())
    }

    fn ref_path(&self, name: &str) -> Result<std::path::PathBuf, RepoError> {
        if name.is_empty() || name.starts_with('/') || name.contains("..") {
            return Err(RepoError::InvalidRef {
                name: name.to_string(),
                reason: "ref name escapes the ref namespace".into(),
            });
        }
        Ok(self.git_dir().join(name))
    }
}
