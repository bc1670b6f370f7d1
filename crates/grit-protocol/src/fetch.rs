//! The upload-pack fetch exchange: one want, no haves, done.

use grit_hash::ObjectId;
use grit_transport::HttpClient;

use crate::pktline::{PktLine, PktLineReader};
use crate::refs;
use crate::sideband::SidebandReader;
use crate::ProtocolError;

/// Capabilities requested with the single want line.
pub const FETCH_CAPABILITIES: &str = "multi_ack_detailed side-band-64k thin-pack ofs-delta";

/// Build the upload-pack request body: the want pkt-line, a flush, and the
/// literal done packet.
pub fn build_upload_pack_request(head: &ObjectId) -> Vec<u8> {
    let want = format!("want {} {}\n", head.to_hex(), FETCH_CAPABILITIES);
    let mut body = format!("{:04x}{}", want.len() + 4, want).into_bytes();
    body.extend_from_slice(b"0000");
    body.extend_from_slice(b"0009done\n");
    body
}

/// Extract the packfile bytes from an upload-pack response.
///
/// Because the request ends with `done`, the server opens with its ACK/NAK
/// verdict; with no haves sent that is a single NAK. The side-band stream
/// follows immediately.
pub fn read_pack_stream(response: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut reader = PktLineReader::new(response);

    loop {
        match reader.read_pkt()? {
            PktLine::Data(line) => {
                if line.as_slice() == b"NAK\n" {
                    break;
                }
                if line.starts_with(b"ACK ") {
                    continue;
                }
                return Err(ProtocolError::Protocol(format!(
                    "unexpected upload-pack status line: {}",
                    String::from_utf8_lossy(&line)
                )));
            }
            PktLine::Flush => {
                return Err(ProtocolError::Protocol(
                    "upload-pack response ended before pack data".into(),
                ));
            }
        }
    }

    SidebandReader::new(reader).read_all_data()
}

/// Run the full fetch exchange against a remote.
///
/// Returns the advertised `HEAD` id and the raw packfile bytes.
pub fn fetch_pack(client: &HttpClient) -> Result<(ObjectId, Vec<u8>), ProtocolError> {
    let advertisement = client.info_refs()?;
    let advertised = refs::parse_advertisement(&advertisement)?;
    let head = refs::head_id(&advertised)?;

    let response = client.upload_pack(build_upload_pack_request(&head))?;
    let pack = read_pack_stream(&response)?;
    Ok((head, pack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pktline::PktLineWriter;

    const HEAD_HEX: &str = "95d09f2b10159347eece71399a7e2e907ea3df4f";

    #[test]
    fn request_body_is_byte_exact() {
        let head = ObjectId::from_hex(HEAD_HEX).unwrap();
        let body = build_upload_pack_request(&head);

        let want_line = format!(
            "want {HEAD_HEX} multi_ack_detailed side-band-64k thin-pack ofs-delta\n"
        );
        let mut expected = format!("{:04x}{}", want_line.len() + 4, want_line).into_bytes();
        expected.extend_from_slice(b"00000009done\n");
        assert_eq!(body, expected);
        // 99 bytes of want line + the 4-byte prefix = 0x67.
        assert!(body.starts_with(b"0067want "));
        assert!(body.ends_with(b"00000009done\n"));
    }

    fn banded(band: u8, payload: &[u8]) -> Vec<u8> {
        let mut pkt = vec![band];
        pkt.extend_from_slice(payload);
        let mut buf = Vec::new();
        PktLineWriter::new(&mut buf).write_line(&pkt).unwrap();
        buf
    }

    #[test]
    fn response_demuxes_after_nak() {
        let mut response = Vec::new();
        PktLineWriter::new(&mut response).write_text("NAK").unwrap();
        response.extend_from_slice(&banded(2, b"Enumerating objects: 3, done.\n"));
        response.extend_from_slice(&banded(1, b"PACK"));
        response.extend_from_slice(&banded(1, b"rest"));
        response.extend_from_slice(b"0000");

        let pack = read_pack_stream(&response).unwrap();
        assert_eq!(pack, b"PACKrest");
    }

    #[test]
    fn response_skips_ack_lines() {
        let mut response = Vec::new();
        {
            let mut writer = PktLineWriter::new(&mut response);
            writer
                .write_text(&format!("ACK {HEAD_HEX} common"))
                .unwrap();
            writer.write_text("NAK").unwrap();
        }
        response.extend_from_slice(&banded(1, b"PACK"));
        response.extend_from_slice(b"0000");

        assert_eq!(read_pack_stream(&response).unwrap(), b"PACK");
    }

    #[test]
    fn server_error_band_aborts() {
        let mut response = Vec::new();
        PktLineWriter::new(&mut response).write_text("NAK").unwrap();
        response.extend_from_slice(&banded(3, b"access denied\n"));
        response.extend_from_slice(b"0000");

        assert!(matches!(
            read_pack_stream(&response),
            Err(ProtocolError::Server(_))
        ));
    }

    #[test]
    fn garbage_status_line_is_rejected() {
        let mut response = Vec::new();
        PktLineWriter::new(&mut response).write_text("HELLO").unwrap();
        assert!(matches!(
            read_pack_stream(&response),
            Err(ProtocolError::Protocol(_))
        ));
    }
}
