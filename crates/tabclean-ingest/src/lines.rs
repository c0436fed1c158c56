//! Raw line reading for the row corrector.

use std::path::Path;

use tabclean_model::RawLine;
use tracing::info;

use crate::encoding::read_text;
use crate::error::Result;

/// Read a file as decoded lines without their terminators.
pub fn read_raw_lines(path: &Path, encoding: &str) -> Result<Vec<RawLine>> {
    let text = read_text(path, encoding)?;
    let lines: Vec<RawLine> = text
        .lines()
        .enumerate()
        .map(|(index, line)| RawLine::new(index, line))
        .collect();
    info!(path = %path.display(), lines = lines.len(), "Read raw source lines");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_raw_lines_strips_terminators() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFid;name\r\n1;Ana\n2;Rui\n").unwrap();

        let lines = read_raw_lines(file.path(), "UTF-8-SIG").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RawLine::new(0, "id;name"));
        assert_eq!(lines[1].text, "1;Ana");
        assert_eq!(lines[2].index, 2);
    }

    #[test]
    fn test_read_raw_lines_missing_file() {
        let err = read_raw_lines(Path::new("/nonexistent/source.txt"), "UTF-8").unwrap_err();
        assert!(matches!(err, crate::IngestError::FileNotFound { .. }));
    }
}
