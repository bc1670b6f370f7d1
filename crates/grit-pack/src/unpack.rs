//! Sequential pack ingestion.
//!
//! Walks the N records of an in-memory pack in stream order, resolving
//! deltas as it goes and persisting every resolved object to the loose
//! store. Offset-deltas can only point backwards, so a single forward pass
//! with a base map keyed by record start offset is sufficient.

use std::collections::HashMap;

use grit_hash::hasher::Hasher;
use grit_hash::ObjectId;
use grit_object::ObjectType;
use grit_odb::LooseStore;

use crate::entry::parse_entry_header;
use crate::{
    delta, inflate, PackEntryType, PackError, PACK_HEADER_SIZE, PACK_SIGNATURE,
    PACK_TRAILER_SIZE, PACK_VERSION,
};

/// Pack ingestion driver.
pub struct Unpacker<'a> {
    store: &'a LooseStore,
}

impl<'a> Unpacker<'a> {
    pub fn new(store: &'a LooseStore) -> Self {
        Self { store }
    }

    /// Decode every record of `data` and persist the resolved objects.
    ///
    /// Returns the object ids in record order. `data` must be the complete
    /// pack, header through trailing checksum; the checksum itself is NOT
    /// verified here; see [`verify_checksum`].
    pub fn unpack(&self, data: &[u8]) -> Result<Vec<ObjectId>, PackError> {
        let count = parse_pack_header(data)?;

        // Resolved records by their starting byte offset, for ofs-delta
        // bases. Kind rides along so deltas inherit it transitively.
        let mut bases: HashMap<u64, (ObjectType, Vec<u8>)> = HashMap::new();
        let mut ids = Vec::with_capacity(count);
        let mut pos = PACK_HEADER_SIZE;

        for _ in 0..count {
            let start = pos as u64;
            let entry = parse_entry_header(&data[pos..], start)?;
            pos += entry.header_size;

            let (obj_type, payload) = match entry.entry_type {
                PackEntryType::Commit
                | PackEntryType::Tree
                | PackEntryType::Blob
                | PackEntryType::Tag => {
                    let (payload, used) = inflate::inflate(&data[pos..], entry.size)?;
                    pos += used;
                    if payload.len() != entry.size {
                        return Err(PackError::Invalid(format!(
                            "record at offset {start} declares {} bytes, inflated {}",
                            entry.size,
                            payload.len()
                        )));
                    }
                    let obj_type = entry
                        .entry_type
                        .to_object_type()
                        .expect("non-delta record type");
                    (obj_type, payload)
                }
                PackEntryType::OfsDelta { base_offset } => {
                    let (base_type, base) = bases
                        .get(&base_offset)
                        .ok_or(PackError::MissingBaseOffset(base_offset))?;
                    let (delta_buf, used) = inflate::inflate(&data[pos..], entry.size)?;
                    pos += used;
                    (*base_type, delta::apply_delta(base, &delta_buf)?)
                }
                PackEntryType::RefDelta { base_oid } => {
                    // Earlier records of this pack are already in the store,
                    // so one lookup covers them and pre-existing objects.
                    let (base_type, base) = self
                        .store
                        .read(&base_oid)?
                        .ok_or(PackError::MissingBaseObject(base_oid))?;
                    let (delta_buf, used) = inflate::inflate(&data[pos..], entry.size)?;
                    pos += used;
                    (base_type, delta::apply_delta(&base, &delta_buf)?)
                }
            };

            let oid = self.store.write(obj_type, &payload)?;
            ids.push(oid);
            bases.insert(start, (obj_type, payload));
        }

        Ok(ids)
    }
}

/// Validate the 12-byte pack header and return the object count.
pub fn parse_pack_header(data: &[u8]) -> Result<usize, PackError> {
    if data.len() < PACK_HEADER_SIZE {
        return Err(PackError::Truncated(data.len() as u64));
    }
    if &data[0..4] != PACK_SIGNATURE {
        return Err(PackError::Invalid("bad PACK signature".into()));
    }
    let version = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if version != PACK_VERSION {
        return Err(PackError::UnsupportedVersion(version));
    }
    Ok(u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize)
}

/// Verify the pack's trailing SHA-1 over everything before it.
pub fn verify_checksum(data: &[u8]) -> Result<(), PackError> {
    if data.len() < PACK_HEADER_SIZE + PACK_TRAILER_SIZE {
        return Err(PackError::Truncated(data.len() as u64));
    }
    let (body, trailer) = data.split_at(data.len() - PACK_TRAILER_SIZE);
    let expected = ObjectId::from_bytes(trailer).expect("trailer is 20 bytes");
    let actual = Hasher::digest(body);
    if expected != actual {
        return Err(PackError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}
