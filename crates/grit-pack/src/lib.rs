//! Packfile stream decoding.
//!
//! A pack is `"PACK"`, a version, an object count, N object records, and a
//! trailing SHA-1 of everything before it. Records carry either a full
//! object payload or a delta against an earlier record (by byte offset) or
//! an already-stored object (by id). This crate walks that stream in order,
//! resolves every record, and persists the results to the loose store.

pub mod delta;
pub mod entry;
pub mod inflate;
mod unpack;

pub use unpack::{verify_checksum, Unpacker};

use grit_hash::ObjectId;
use grit_object::ObjectType;

/// Errors that can occur while decoding a pack.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("invalid pack: {0}")]
    Invalid(String),

    #[error("truncated pack at offset {0}")]
    Truncated(u64),

    #[error("unsupported pack version: {0}")]
    UnsupportedVersion(u32),

    #[error("delta base not found at offset {0}")]
    MissingBaseOffset(u64),

    #[error("delta base not found: {0}")]
    MissingBaseObject(ObjectId),

    #[error("pack checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        expected: ObjectId,
        actual: ObjectId,
    },

    #[error("invalid delta at offset {offset}: {reason}")]
    InvalidDelta { offset: usize, reason: String },

    #[error("invalid delta instruction (opcode 0) at offset {0}")]
    InvalidDeltaInstruction(usize),

    #[error("delta base size mismatch: delta declares {declared}, base is {actual}")]
    BaseSizeMismatch { declared: usize, actual: usize },

    #[error("delta result size mismatch: delta declares {declared}, produced {actual}")]
    ResultSizeMismatch { declared: usize, actual: usize },

    #[error(transparent)]
    Store(#[from] grit_odb::StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Type of a packed object record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackEntryType {
    Commit,
    Tree,
    Blob,
    Tag,
    /// Delta against an earlier record in the same pack, located by the
    /// absolute offset of that record's first header byte.
    OfsDelta { base_offset: u64 },
    /// Delta against an object identified by its id.
    RefDelta { base_oid: ObjectId },
}

impl PackEntryType {
    /// Convert a non-delta record type to an ObjectType.
    pub fn to_object_type(self) -> Option<ObjectType> {
        match self {
            Self::Commit => Some(ObjectType::Commit),
            Self::Tree => Some(ObjectType::Tree),
            Self::Blob => Some(ObjectType::Blob),
            Self::Tag => Some(ObjectType::Tag),
            Self::OfsDelta { .. } | Self::RefDelta { .. } => None,
        }
    }
}

/// Pack format constants.
pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";
pub const PACK_VERSION: u32 = 2;
pub const PACK_HEADER_SIZE: usize = 12;
pub const PACK_TRAILER_SIZE: usize = 20;
