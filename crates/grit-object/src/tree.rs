use std::cmp::Ordering;

use bstr::{BStr, BString};
use grit_hash::ObjectId;

use crate::ObjectError;

/// File mode for tree entries. The mode set is closed; anything else is a
/// parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Submodule link (160000)
    Gitlink,
    /// Subdirectory (40000)
    Tree,
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g. `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"100644" => Ok(Self::Regular),
            b"100755" => Ok(Self::Executable),
            b"120000" => Ok(Self::Symlink),
            b"160000" => Ok(Self::Gitlink),
            b"40000" | b"040000" => Ok(Self::Tree),
            _ => Err(ObjectError::InvalidFileMode(
                String::from_utf8_lossy(s).into(),
            )),
        }
    }

    /// Serialize to octal ASCII bytes (git's canonical format, trees without
    /// a leading zero).
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"100644",
            Self::Executable => b"100755",
            Self::Symlink => b"120000",
            Self::Gitlink => b"160000",
            Self::Tree => b"40000",
        }
    }

    /// The raw numeric mode value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a symlink?
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    /// Is this a gitlink (submodule)?
    pub fn is_gitlink(&self) -> bool {
        matches!(self, Self::Gitlink)
    }
}

/// A single entry in a git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Compare entries using git's tree sorting rules.
    ///
    /// Directories sort as if their name had a trailing '/'. So "foo" (dir)
    /// sorts after "foo.c" but a plain file "foo" sorts before it.
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        base_name_compare(
            a.name.as_ref(),
            a.mode.is_tree(),
            b.name.as_ref(),
            b.mode.is_tree(),
        )
    }
}

/// Git's tree entry name comparison.
///
/// After the common prefix, directory names get an implicit trailing '/' for
/// comparison, matching C git's `base_name_compare`.
fn base_name_compare(name1: &[u8], is_dir1: bool, name2: &[u8], is_dir2: bool) -> Ordering {
    let min_len = name1.len().min(name2.len());
    let cmp = name1[..min_len].cmp(&name2[..min_len]);
    if cmp != Ordering::Equal {
        return cmp;
    }
    // One name is a prefix of the other. The "next character" is null at the
    // end of a name, except directories continue with '/'.
    let c1 = if name1.len() > min_len {
        name1[min_len]
    } else if is_dir1 {
        b'/'
    } else {
        0
    };
    let c2 = if name2.len() > min_len {
        name2[min_len]
    } else if is_dir2 {
        b'/'
    } else {
        0
    };
    c1.cmp(&c2)
}

/// A git tree object: a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree payload bytes.
    ///
    /// Each entry is `<mode> <name>\0<oid-20-bytes>`. A trailing incomplete
    /// record is an error.
    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let space_pos = payload[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode =
                FileMode::from_bytes(&payload[pos..space_pos]).map_err(|_| {
                    ObjectError::InvalidTreeEntry {
                        offset: pos,
                        reason: "invalid mode".into(),
                    }
                })?;

            let name_start = space_pos + 1;
            let null_pos = payload[name_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let name = &payload[name_start..null_pos];
            if name.is_empty() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "empty entry name".into(),
                });
            }
            if name.contains(&b'/') {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "entry name contains '/'".into(),
                });
            }

            let oid_start = null_pos + 1;
            if oid_start + 20 > payload.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated OID".into(),
                });
            }
            let oid = ObjectId::from_bytes(&payload[oid_start..oid_start + 20])?;

            entries.push(TreeEntry {
                mode,
                name: BString::from(name),
                oid,
            });
            pos = oid_start + 20;
        }

        Ok(Self { entries })
    }

    /// Serialize the tree payload, writing entries in git canonical order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| TreeEntry::cmp_entries(a, b));

        let mut out = Vec::new();
        for entry in sorted {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_slice() == &**name)
    }

    /// Iterate entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
