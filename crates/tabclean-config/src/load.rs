//! Locating and reading source documents.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use tracing::{debug, info};

use crate::document::SourceConfig;
use crate::error::{ConfigError, Result};

/// `{params_dir}/{product}/{src_tag}.yaml`
pub fn source_config_path(params_dir: &Path, product: &str, src_tag: &str) -> PathBuf {
    params_dir.join(product).join(format!("{src_tag}.yaml"))
}

/// Read and parse a source document.
///
/// Documents are expected in UTF-8; files saved with a Windows ANSI code page
/// are decoded as Windows-1252.
pub fn load_source_config(path: &Path) -> Result<SourceConfig> {
    info!(path = %path.display(), "reading source configuration");
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_document(&bytes);
    parse_source_config(&text, path)
}

/// Parse document text. `path` is only used in error messages.
pub fn parse_source_config(text: &str, path: &Path) -> Result<SourceConfig> {
    serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_document(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("configuration is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_path_layout() {
        let path = source_config_path(Path::new("params"), "master", "clients");
        assert_eq!(path, Path::new("params").join("master").join("clients.yaml"));
    }

    #[test]
    fn test_decode_document_handles_bom_and_ansi() {
        assert_eq!(decode_document(b"\xEF\xBB\xBFa: 1"), "a: 1");
        assert_eq!(decode_document(b"name: Jo\xE3o"), "name: João");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_source_config(Path::new("/nonexistent/tabclean.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
