//! Text decoding for source files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tabclean_common::resolve_encoding;
use tracing::warn;

use crate::error::{IngestError, Result};

/// Decode bytes with the configured encoding, dropping any byte order mark.
///
/// Malformed sequences become replacement characters and are reported once.
pub fn decode_bytes(bytes: &[u8], label: &str, path: &Path) -> Result<String> {
    let encoding = resolve_encoding(label).ok_or_else(|| IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: label.to_string(),
    })?;
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "Source contains bytes that are invalid in the configured encoding"
        );
    }
    Ok(text.into_owned())
}

/// Read and decode a whole file.
pub fn read_text(path: &Path, label: &str) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    decode_bytes(&bytes, label, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_bom() {
        let path = Path::new("mem.csv");
        let text = decode_bytes(b"\xEF\xBB\xBFa;b", "UTF-8-SIG", path).unwrap();
        assert_eq!(text, "a;b");
    }

    #[test]
    fn test_decode_windows_1252() {
        let path = Path::new("mem.csv");
        let text = decode_bytes(b"Jo\xe3o", "ANSI", path).unwrap();
        assert_eq!(text, "João");
    }

    #[test]
    fn test_unknown_encoding_is_an_error() {
        let path = Path::new("mem.csv");
        assert!(matches!(
            decode_bytes(b"x", "klingon", path),
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }
}
