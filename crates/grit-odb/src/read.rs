use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use grit_hash::ObjectId;
use grit_object::header;
use grit_object::ObjectType;

use crate::{LooseStore, StoreError};

impl LooseStore {
    /// Check if a loose object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read a loose object by OID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` if the object exists but is corrupt.
    pub fn read(&self, oid: &ObjectId) -> Result<Option<(ObjectType, Vec<u8>)>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let decompressed = decompress_all(&compressed, oid)?;
        let (obj_type, size, header_len) =
            header::parse_header(&decompressed).map_err(|e| StoreError::Corrupt {
                oid: oid.to_hex(),
                reason: e.to_string(),
            })?;

        let payload = &decompressed[header_len..];
        if payload.len() != size {
            return Err(StoreError::Corrupt {
                oid: oid.to_hex(),
                reason: format!("header declares {} bytes, payload has {}", size, payload.len()),
            });
        }

        Ok(Some((obj_type, payload.to_vec())))
    }

    /// Read just the header (kind + size) without keeping the payload.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_header(
        &self,
        oid: &ObjectId,
    ) -> Result<Option<(ObjectType, usize)>, StoreError> {
        match self.read(oid)? {
            Some((obj_type, payload)) => Ok(Some((obj_type, payload.len()))),
            None => Ok(None),
        }
    }
}

/// Zlib-decompress the full contents of a loose object file.
fn decompress_all(compressed: &[u8], oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| StoreError::Decompress {
            oid: oid.to_hex(),
            source: e,
        })?;
    Ok(decompressed)
}
