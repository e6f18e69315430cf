//! Turning raw file bytes into text at the I/O boundary.
//!
//! Byte order marks are honoured (UTF-8, UTF-16LE, UTF-16BE); without one the bytes must be
//! valid UTF-8.

use std::{fs::File, io::Read, path::Path};

use crate::error::Error;

/// Decodes in-memory bytes, e.g. from an upload.
pub fn decode_text(bytes: &[u8]) -> Result<String, Error> {
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        return Err(Error::malformed(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Reads and decodes a file.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_plain_utf8() {
        assert_eq!(decode_text("{\"a\":\"ä\"}".as_bytes()).unwrap(), "{\"a\":\"ä\"}");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = [&[0xEF, 0xBB, 0xBF][..], b"<xliff/>"].concat();
        assert_eq!(decode_text(&bytes).unwrap(), "<xliff/>");
    }

    #[test]
    fn test_decode_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "{}".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "{}");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode_text(&[0x7B, 0xFF, 0x7D]),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_read_text_from_utf16_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "{\"k\":\"v\"}".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        file.write_all(&bytes).unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "{\"k\":\"v\"}");
    }
}
