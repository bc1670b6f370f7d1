//! Side-band demultiplexing.
//!
//! Inside each non-flush packet of an upload-pack response the first
//! payload byte selects a band:
//! - band 1: packfile data
//! - band 2: progress text, relayed to stderr
//! - band 3: fatal error text; relayed to stderr and aborts the transfer

use std::io::Read;

use crate::pktline::{PktLine, PktLineReader};
use crate::ProtocolError;

/// Demultiplexes a side-band stream read from pkt-lines.
pub struct SidebandReader<R> {
    reader: PktLineReader<R>,
}

impl<R: Read> SidebandReader<R> {
    pub fn new(reader: PktLineReader<R>) -> Self {
        Self { reader }
    }

    /// Read the next band-1 chunk.
    ///
    /// Progress (band 2) goes to stderr along the way. Returns `None` at
    /// the flush packet ending the stream, `Err` on a band-3 message or a
    /// band code outside {1, 2, 3}.
    pub fn read_data(&mut self) -> Result<Option<Vec<u8>>, ProtocolError> {
        loop {
            match self.reader.read_pkt()? {
                PktLine::Flush => return Ok(None),
                PktLine::Data(data) => {
                    let (band, payload) = data.split_first().ok_or_else(|| {
                        ProtocolError::Protocol("empty side-band packet".into())
                    })?;
                    match *band {
                        1 => return Ok(Some(payload.to_vec())),
                        2 => {
                            eprint!("remote: {}", String::from_utf8_lossy(payload));
                        }
                        3 => {
                            let msg = String::from_utf8_lossy(payload).trim_end().to_string();
                            eprintln!("remote error: {msg}");
                            return Err(ProtocolError::Server(msg));
                        }
                        other => {
                            return Err(ProtocolError::Protocol(format!(
                                "unknown side-band code: {other}"
                            )));
                        }
                    }
                }
            }
        }
    }

    /// Concatenate every band-1 chunk until the stream ends.
    pub fn read_all_data(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let mut result = Vec::new();
        while let Some(chunk) = self.read_data()? {
            result.extend_from_slice(&chunk);
        }
        Ok(result)
    }
}
