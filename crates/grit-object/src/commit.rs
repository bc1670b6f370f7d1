use bstr::{BStr, BString, ByteSlice};
use grit_hash::ObjectId;

use crate::{ObjectError, Signature};

/// A git commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: ObjectId,
    /// Parent commit OIDs in header order (empty for a root commit).
    pub parents: Vec<ObjectId>,
    /// Author identity and timestamp.
    pub author: Signature,
    /// Committer identity and timestamp.
    pub committer: Signature,
    /// Headers this client does not interpret (gpgsig, encoding, ...),
    /// preserved verbatim in order for byte-exact round trips.
    pub extra_headers: Vec<(BString, BString)>,
    /// Commit message (everything after the blank line separator).
    pub message: BString,
}

impl Commit {
    /// Parse commit payload bytes (no loose-object header).
    ///
    /// The `tree` header must come first; `parent` headers keep their order;
    /// unknown headers are preserved, including their continuation lines.
    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;
        let mut extra_headers: Vec<(BString, BString)> = Vec::new();

        let data = payload;
        let mut pos = 0;
        let mut first = true;

        loop {
            if pos >= data.len() {
                break;
            }
            // A blank line separates headers from the message.
            if data[pos] == b'\n' {
                pos += 1;
                break;
            }

            let line_end = data[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|p| p + pos)
                .unwrap_or(data.len());
            let line = &data[pos..line_end];

            let space_pos = line.iter().position(|&b| b == b' ').ok_or_else(|| {
                ObjectError::InvalidHeader(format!(
                    "malformed commit header line: {:?}",
                    line.as_bstr()
                ))
            })?;
            let key = &line[..space_pos];
            let value = &line[space_pos + 1..];

            if first {
                if key != b"tree" {
                    return Err(ObjectError::TreeNotFirst);
                }
                first = false;
            }

            match key {
                b"tree" => {
                    tree = Some(parse_oid_value(value)?);
                }
                b"parent" => {
                    parents.push(parse_oid_value(value)?);
                }
                b"author" => {
                    author = Some(Signature::parse(BStr::new(value))?);
                }
                b"committer" => {
                    committer = Some(Signature::parse(BStr::new(value))?);
                }
                _ => {
                    // Unknown header; continuation lines start with a space.
                    let mut val = Vec::from(value);
                    let mut next = line_end + 1;
                    while next < data.len() && data[next] == b' ' {
                        val.push(b'\n');
                        let cont_end = data[next..]
                            .iter()
                            .position(|&b| b == b'\n')
                            .map(|p| p + next)
                            .unwrap_or(data.len());
                        val.extend_from_slice(&data[next + 1..cont_end]);
                        next = cont_end + 1;
                    }
                    extra_headers.push((BString::from(key), BString::from(val)));
                    pos = next;
                    continue;
                }
            }

            pos = line_end + 1;
        }

        let tree = tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let author = author.ok_or(ObjectError::MissingCommitField { field: "author" })?;
        let committer = committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?;

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            extra_headers,
            message: BString::from(&data[pos.min(data.len())..]),
        })
    }

    /// Serialize the commit payload (no loose-object header).
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');

        for parent in &self.parents {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }

        out.extend_from_slice(b"author ");
        out.extend_from_slice(&self.author.to_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"committer ");
        out.extend_from_slice(&self.committer.to_bytes());
        out.push(b'\n');

        for (key, val) in &self.extra_headers {
            out.extend_from_slice(key);
            out.push(b' ');
            for (i, line) in val.split(|&b| b == b'\n').enumerate() {
                if i > 0 {
                    out.push(b'\n');
                    out.push(b' ');
                }
                out.extend_from_slice(line);
            }
            out.push(b'\n');
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// First parent, or None for root commits.
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }
}

fn parse_oid_value(value: &[u8]) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::InvalidHeader("non-UTF8 object id".into()))?;
    Ok(ObjectId::from_hex(hex)?)
}
