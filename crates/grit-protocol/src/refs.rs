//! V0/v1 ref advertisement parsing.
//!
//! The smart-HTTP advertisement is a pkt-line stream: a
//! `# service=git-upload-pack` announcement, a flush, then one
//! `<40-hex-id> SP <refname>` line per ref (the first also carries the
//! server capabilities after a NUL), then a final flush.

use bstr::BString;
use grit_hash::ObjectId;

use crate::pktline::{PktLine, PktLineReader};
use crate::ProtocolError;

/// Parse an advertisement into `(id, refname)` pairs in server order.
///
/// The service announcement line and the capability list are consumed and
/// dropped; this client's request capabilities are fixed.
pub fn parse_advertisement(data: &[u8]) -> Result<Vec<(ObjectId, BString)>, ProtocolError> {
    let mut reader = PktLineReader::new(data);
    let mut refs = Vec::new();
    let mut pending_service_flush = false;

    loop {
        match reader.read_pkt()? {
            PktLine::Flush => {
                // The announcement line is followed by its own flush; only
                // the one after the ref list ends the advertisement.
                if pending_service_flush {
                    pending_service_flush = false;
                    continue;
                }
                break;
            }
            PktLine::Data(line) => {
                if line.starts_with(b"#") {
                    pending_service_flush = true;
                    continue;
                }
                parse_ref_line(&line, &mut refs)?;
            }
        }
    }

    Ok(refs)
}

/// Find the advertised id of `HEAD`.
pub fn head_id(refs: &[(ObjectId, BString)]) -> Result<ObjectId, ProtocolError> {
    refs.iter()
        .find(|(_, name)| name.as_slice() == b"HEAD")
        .map(|(oid, _)| *oid)
        .ok_or(ProtocolError::MissingHead)
}

/// Parse one `<id> SP <name>[\0<capabilities>]` line.
fn parse_ref_line(
    line: &[u8],
    refs: &mut Vec<(ObjectId, BString)>,
) -> Result<(), ProtocolError> {
    // Capabilities ride after a NUL on the first ref line.
    let line = match line.iter().position(|&b| b == 0) {
        Some(nul) => &line[..nul],
        None => line,
    };
    let line = match line.last() {
        Some(&b'\n') => &line[..line.len() - 1],
        _ => line,
    };
    if line.is_empty() {
        return Ok(());
    }

    let space = line.iter().position(|&b| b == b' ').ok_or_else(|| {
        ProtocolError::Protocol(format!(
            "malformed ref line: {}",
            String::from_utf8_lossy(line)
        ))
    })?;

    let hex = std::str::from_utf8(&line[..space])
        .map_err(|_| ProtocolError::Protocol("non-UTF-8 ref id".into()))?;
    let oid = ObjectId::from_hex(hex)
        .map_err(|e| ProtocolError::Protocol(format!("bad ref id: {e}")))?;

    refs.push((oid, BString::from(&line[space + 1..])));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pktline::PktLineWriter;

    const HEAD_HEX: &str = "95d09f2b10159347eece71399a7e2e907ea3df4f";

    fn advertisement() -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = PktLineWriter::new(&mut buf);
        writer.write_text("# service=git-upload-pack").unwrap();
        writer.write_flush().unwrap();
        writer
            .write_text(&format!(
                "{HEAD_HEX} HEAD\0multi_ack side-band-64k ofs-delta symref=HEAD:refs/heads/main"
            ))
            .unwrap();
        writer
            .write_text(&format!("{HEAD_HEX} refs/heads/main"))
            .unwrap();
        writer.write_flush().unwrap();
        buf
    }

    #[test]
    fn parses_refs_and_drops_capabilities() {
        let refs = parse_advertisement(&advertisement()).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].1, "HEAD");
        assert_eq!(refs[1].1, "refs/heads/main");
        assert_eq!(refs[0].0.to_hex(), HEAD_HEX);
    }

    #[test]
    fn head_id_found() {
        let refs = parse_advertisement(&advertisement()).unwrap();
        assert_eq!(head_id(&refs).unwrap().to_hex(), HEAD_HEX);
    }

    #[test]
    fn missing_head_is_an_error() {
        let mut buf = Vec::new();
        let mut writer = PktLineWriter::new(&mut buf);
        writer.write_text("# service=git-upload-pack").unwrap();
        writer.write_flush().unwrap();
        writer
            .write_text(&format!("{HEAD_HEX} refs/heads/dev\0caps"))
            .unwrap();
        writer.write_flush().unwrap();

        let refs = parse_advertisement(&buf).unwrap();
        assert!(matches!(head_id(&refs), Err(ProtocolError::MissingHead)));
    }

    #[test]
    fn advertisement_without_service_line() {
        // Plain streams (no smart-HTTP announcement) parse too.
        let mut buf = Vec::new();
        let mut writer = PktLineWriter::new(&mut buf);
        writer.write_text(&format!("{HEAD_HEX} HEAD\0caps")).unwrap();
        writer.write_flush().unwrap();

        let refs = parse_advertisement(&buf).unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn malformed_ref_line_is_an_error() {
        let mut buf = Vec::new();
        let mut writer = PktLineWriter::new(&mut buf);
        writer.write_text("notahexidandnospace").unwrap();
        writer.write_flush().unwrap();
        assert!(parse_advertisement(&buf).is_err());
    }
}
