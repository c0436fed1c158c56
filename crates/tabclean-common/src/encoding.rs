//! Encoding labels used in source configurations.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Label that asks for UTF-8 with a byte order mark.
pub fn is_utf8_sig(label: &str) -> bool {
    matches!(normalize_label(label).as_str(), "utf-8-sig" | "utf8-sig")
}

/// Resolve an encoding label.
///
/// Besides the WHATWG labels understood by `encoding_rs`, accepts the spellings
/// found in source configurations: `UTF-8-SIG` (UTF-8 with a byte order mark)
/// and `ANSI` (Windows-1252).
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    let normalized = normalize_label(label);
    match normalized.as_str() {
        "utf-8-sig" | "utf8-sig" | "utf" => Some(UTF_8),
        "ansi" | "cp1252" | "mbcs" | "latin1" | "latin-1" => Some(WINDOWS_1252),
        other => Encoding::for_label(other.as_bytes()),
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase().replace('_', "-")
}
