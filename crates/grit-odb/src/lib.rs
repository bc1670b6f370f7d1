//! Loose object storage: read and write zlib-compressed objects.
//!
//! Each loose object lives at `.git/objects/XX/YYYY...` where `XX` is the
//! first byte of the OID in hex and `YYYY...` is the rest. The file content
//! is zlib-compressed `"<kind> <size>\0<payload>"`. Objects are immutable
//! and content-addressed; writing an object that already exists is a no-op.

mod read;
mod write;

use std::path::{Path, PathBuf};

use grit_hash::ObjectId;

/// Interface to the loose object directory (`.git/objects/`).
pub struct LooseStore {
    objects_dir: PathBuf,
}

impl LooseStore {
    /// Open the loose object store at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    /// The objects directory this store reads and writes.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }
}

/// Errors from loose object operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("corrupt loose object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error("decompression error for {oid}: {source}")]
    Decompress {
        oid: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_fan_out() {
        let store = LooseStore::open("/tmp/objects");
        let oid = ObjectId::from_hex("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0").unwrap();
        assert_eq!(
            store.object_path(&oid),
            PathBuf::from("/tmp/objects/b6/fc4c620b67d95f953a5c1c1230aaab5db5a1b0")
        );
    }
}
