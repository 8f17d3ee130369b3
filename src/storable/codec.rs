//! The canonical object encoding, `"<kind> <len>\0<payload>"`.
//!
//! This is the exact byte sequence that is hashed to produce an object's address and that is
//! compressed onto disk.

use super::ObjectKind;
use crate::error::{Error, Result};

/// A decoded object. The declared size always equals `payload.len()`.
#[derive(Debug, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub kind: ObjectKind,
    pub payload: &'a [u8],
}

pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let kind = kind.as_str();
    let len = payload.len().to_string();
    let mut formatted = Vec::with_capacity(kind.len() + len.len() + 2 + payload.len());
    formatted.extend_from_slice(kind.as_bytes());
    formatted.push(b' ');
    formatted.extend_from_slice(len.as_bytes());
    formatted.push(b'\0');
    formatted.extend_from_slice(payload);
    formatted
}

pub fn decode(bytes: &[u8]) -> Result<Decoded<'_>> {
    let space_idx =
        memchr::memchr(b' ', bytes).ok_or_else(|| Error::malformed("no object type delimiter"))?;
    let kind = &bytes[..space_idx];
    let kind = ObjectKind::from_bytes(kind).ok_or_else(|| {
        Error::malformed(format!(
            "unknown object type '{}'",
            String::from_utf8_lossy(kind)
        ))
    })?;

    let rest = &bytes[space_idx + 1..];
    let nul_idx =
        memchr::memchr(b'\0', rest).ok_or_else(|| Error::malformed("no object size delimiter"))?;
    let size = parse_size(&rest[..nul_idx])?;

    let payload = &rest[nul_idx + 1..];
    if payload.len() != size {
        return Err(Error::malformed(format!(
            "object size mismatch: expected {size}, read {}",
            payload.len()
        )));
    }

    Ok(Decoded { kind, payload })
}

/// Only plain ASCII decimal digits are accepted: no sign, no whitespace, no empty field.
fn parse_size(field: &[u8]) -> Result<usize> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(Error::malformed(format!(
            "invalid object size '{}'",
            String::from_utf8_lossy(field)
        )));
    }
    // All bytes are ASCII digits, so this is valid UTF-8.
    let field = std::str::from_utf8(field).map_err(|e| Error::malformed(e.to_string()))?;
    field
        .parse()
        .map_err(|_| Error::malformed(format!("object size out of range: {field}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_malformed(input: &[u8]) {
        match decode(input) {
            Err(Error::MalformedObject(_)) => {}
            other => panic!(
                "expected MalformedObject for {:?}, got {other:?}",
                String::from_utf8_lossy(input)
            ),
        }
    }

    #[test]
    fn encode_blob() {
        assert_eq!(encode(ObjectKind::Blob, b"hello\n"), b"blob 6\0hello\n");
        assert_eq!(encode(ObjectKind::Tree, b""), b"tree 0\0");
    }

    #[test]
    fn decode_each_kind() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            let payload = b"some\0binary \npayload";
            let encoded = encode(kind, payload);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded.kind, kind);
            assert_eq!(decoded.payload, payload);
        }
    }

    #[test]
    fn rejects_length_mismatch() {
        assert_malformed(b"blob 3\0ab");
        assert_malformed(b"blob 1\0ab");
    }

    #[test]
    fn rejects_non_numeric_length() {
        assert_malformed(b"blob abc\0xyz");
        assert_malformed(b"blob 3x\0xyz");
        assert_malformed(b"blob +3\0xyz");
        assert_malformed(b"blob  3\0xyz");
        assert_malformed(b"blob \0");
        assert_malformed(b"blob 99999999999999999999999999\0");
    }

    #[test]
    fn rejects_missing_delimiters() {
        assert_malformed(b"blob");
        assert_malformed(b"blob 3");
        assert_malformed(b"");
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_malformed(b"tag 0\0");
    }
}
