use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use grit_hash::hasher::Hasher;
use grit_hash::ObjectId;
use grit_object::header;
use grit_object::ObjectType;

use crate::{LooseStore, StoreError};

impl LooseStore {
    /// Write an object to the store. Returns the OID.
    ///
    /// Idempotent: if the object already exists, the existing file is
    /// authoritative and nothing is rewritten. New files land via a temp
    /// file and rename so a crashed writer never leaves a partial object.
    pub fn write(&self, obj_type: ObjectType, payload: &[u8]) -> Result<ObjectId, StoreError> {
        let hdr = header::write_header(obj_type, payload.len());

        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()
        };

        if self.contains(&oid) {
            return Ok(oid);
        }

        let final_path = self.object_path(&oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Temp file in the objects dir keeps the rename on one filesystem.
        let tmp_path = write_to_temp(self.objects_dir(), &oid, &hdr, payload)?;
        finalize_object(&tmp_path, &final_path)
            .map(|_| oid)
    }
}

/// Compress header + payload into a temp file under `objects_dir`.
fn write_to_temp(
    objects_dir: &Path,
    oid: &ObjectId,
    hdr: &[u8],
    payload: &[u8],
) -> Result<std::path::PathBuf, StoreError> {
    fs::create_dir_all(objects_dir)?;
    let tmp_path = objects_dir.join(format!("tmp_obj_{}_{}", std::process::id(), oid.to_hex()));

    let file = fs::File::create(&tmp_path)?;
    let mut encoder = ZlibEncoder::new(file, Compression::default());
    encoder.write_all(hdr)?;
    encoder.write_all(payload)?;
    encoder.finish()?;

    Ok(tmp_path)
}

/// Move a temp file to its final destination.
///
/// If the destination appeared in the meantime, the existing file wins and
/// the temp file is discarded (content-addressed idempotency).
fn finalize_object(tmp: &Path, final_path: &Path) -> Result<(), StoreError> {
    match fs::rename(tmp, final_path) {
        Ok(()) => Ok(()),
        Err(_) if final_path.exists() => {
            let _ = fs::remove_file(tmp);
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(tmp);
            Err(StoreError::Io(e))
        }
    }
}
