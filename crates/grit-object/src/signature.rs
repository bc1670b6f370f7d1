use bstr::{BStr, BString, ByteSlice};

use crate::ObjectError;

/// An author or committer identity with its timestamp.
///
/// Wire format: `Name <email> <unix-seconds> <tz>` where `<tz>` is the
/// `+HHMM`/`-HHMM` offset git records with each signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in minutes from UTC (e.g. -300 for -0500).
    pub tz_offset: i32,
}

impl Signature {
    pub fn new(
        name: impl Into<BString>,
        email: impl Into<BString>,
        timestamp: i64,
        tz_offset: i32,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            timestamp,
            tz_offset,
        }
    }

    /// Parse from git format: `Name <email> 1234567890 +0000`.
    pub fn parse(input: &BStr) -> Result<Self, ObjectError> {
        let input: &[u8] = input.as_ref();

        let gt_pos = input
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| ObjectError::InvalidSignature("missing '>'".into()))?;
        let lt_pos = input[..gt_pos]
            .iter()
            .rposition(|&b| b == b'<')
            .ok_or_else(|| ObjectError::InvalidSignature("missing '<'".into()))?;

        let name = input[..lt_pos].trim();
        let email = &input[lt_pos + 1..gt_pos];

        let date_str = std::str::from_utf8(input[gt_pos + 1..].trim())
            .map_err(|_| ObjectError::InvalidSignature("non-UTF-8 date".into()))?;
        let mut parts = date_str.split_ascii_whitespace();

        let timestamp: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ObjectError::InvalidSignature(format!("bad timestamp: {date_str}")))?;
        let tz_offset = match parts.next() {
            Some(tz) => parse_tz(tz)
                .ok_or_else(|| ObjectError::InvalidSignature(format!("bad timezone: {tz}")))?,
            None => 0,
        };

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            timestamp,
            tz_offset,
        })
    }

    /// Serialize to git format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.name);
        out.extend_from_slice(b" <");
        out.extend_from_slice(&self.email);
        out.extend_from_slice(b"> ");
        out.extend_from_slice(self.timestamp.to_string().as_bytes());
        out.push(b' ');
        out.extend_from_slice(format_tz(self.tz_offset).as_bytes());
        out
    }
}

/// Parse `+HHMM`/`-HHMM` into an offset in minutes.
fn parse_tz(tz: &str) -> Option<i32> {
    let bytes = tz.as_bytes();
    if bytes.len() != 5 {
        return None;
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: i32 = tz[1..].parse().ok()?;
    let hours = digits / 100;
    let mins = digits % 100;
    Some(sign * (hours * 60 + mins))
}

/// Format an offset in minutes as `+HHMM`/`-HHMM`.
fn format_tz(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}{:02}", sign, abs / 60, abs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple() {
        let sig = Signature::parse(BStr::new(
            b"John Doe <john@example.com> 1234567890 +0000",
        ))
        .unwrap();
        assert_eq!(sig.name, "John Doe");
        assert_eq!(sig.email, "john@example.com");
        assert_eq!(sig.timestamp, 1234567890);
        assert_eq!(sig.tz_offset, 0);
    }

    #[test]
    fn parse_negative_offset() {
        let sig =
            Signature::parse(BStr::new(b"A B <a@b.com> 1700000000 -0530")).unwrap();
        assert_eq!(sig.tz_offset, -(5 * 60 + 30));
    }

    #[test]
    fn roundtrip() {
        let raw: &[u8] = b"Jane Doe <jane@example.com> 1234567890 +0130";
        let sig = Signature::parse(BStr::new(raw)).unwrap();
        assert_eq!(sig.to_bytes(), raw);
    }

    #[test]
    fn name_with_angle_noise() {
        // Angle brackets in names are resolved from the right.
        let sig = Signature::parse(BStr::new(
            b"Weird <Name> Person <weird@example.com> 1 +0000",
        ))
        .unwrap();
        assert_eq!(sig.email, "weird@example.com");
        assert_eq!(sig.name, "Weird <Name> Person");
    }

    #[test]
    fn missing_email_is_error() {
        assert!(Signature::parse(BStr::new(b"No Email 1234 +0000")).is_err());
    }

    #[test]
    fn bad_timezone_is_error() {
        assert!(Signature::parse(BStr::new(b"A <a@b> 1234 UTC")).is_err());
    }
}
