//! Streaming zlib inflation with stream-boundary reporting.
//!
//! Pack records concatenate their compressed payloads with no length
//! prefix, so the decoder must know exactly where each deflate stream ends.
//! [`inflate`] runs the raw decompressor and reports how many input bytes
//! the stream consumed; the next record begins right after.

use flate2::{Decompress, FlushDecompress, Status};

use crate::PackError;

/// Inflate one zlib stream from the front of `input`.
///
/// Returns the decompressed bytes and the number of input bytes consumed
/// up to and including the end-of-stream marker. Trailing bytes in `input`
/// are left untouched.
pub fn inflate(input: &[u8], size_hint: usize) -> Result<(Vec<u8>, usize), PackError> {
    let mut z = Decompress::new(true);
    let mut out = Vec::with_capacity(size_hint.max(64));

    loop {
        let consumed = z.total_in() as usize;
        if out.len() == out.capacity() {
            out.reserve(64 * 1024);
        }

        let status = z
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| PackError::Invalid(format!("zlib error: {e}")))?;

        match status {
            Status::StreamEnd => return Ok((out, z.total_in() as usize)),
            Status::Ok | Status::BufError => {
                // Either the output buffer filled (grown next iteration) or
                // the decompressor wants input that is not there.
                if z.total_in() as usize == input.len() && out.len() < out.capacity() {
                    return Err(PackError::Truncated(input.len() as u64));
                }
            }
        }
    }
}
