//! Object identity and SHA-1 hashing for the grit clone client.
//!
//! Provides the core [`ObjectId`] type (a 20-byte SHA-1 digest), hex
//! encoding/decoding, and the streaming [`hasher::Hasher`] used to compute
//! ids over the canonical `"<kind> <len>\0<payload>"` serialization.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use oid::ObjectId;
