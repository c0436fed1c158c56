//! Artifact writing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::WriterBuilder;
use polars::prelude::DataFrame;
use tabclean_common::{any_to_string, column_names, is_utf8_sig, resolve_encoding};
use tabclean_model::format_run_timestamp;
use tracing::{info, warn};

use crate::dirs::ensure_dir;
use crate::error::{OutputError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where and how a processed source is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    /// Root of the processed data tree.
    pub base: PathBuf,
    pub product: String,
    pub tag: String,
    /// Partition written to its own `{tag}_{date_part}` folder.
    pub date_part: Option<String>,
    /// Extension of the artifact.
    pub file_type: String,
    pub delimiter: String,
    pub encoding: String,
}

impl ArtifactTarget {
    /// `{base}/{product}/{tag}`, where the most recent artifact is looked up.
    pub fn tag_dir(&self) -> PathBuf {
        self.base.join(&self.product).join(&self.tag)
    }

    /// Tag as it appears in artifact names.
    pub fn artifact_tag(&self) -> String {
        match &self.date_part {
            Some(part) => format!("{}_{part}", self.tag),
            None => self.tag.clone(),
        }
    }

    /// Directory receiving the artifact.
    pub fn artifact_dir(&self) -> PathBuf {
        match &self.date_part {
            Some(_) => self.tag_dir().join(self.artifact_tag()),
            None => self.tag_dir(),
        }
    }

    /// Full path of the artifact for a run.
    pub fn artifact_path(&self, stamp: &NaiveDateTime) -> PathBuf {
        self.artifact_dir().join(format!(
            "{}_{}.{}",
            self.artifact_tag(),
            format_run_timestamp(stamp),
            self.file_type
        ))
    }
}

/// Write a dataset as a delimited artifact and return its path.
///
/// The header row holds the column names. `UTF-8-SIG` prefixes a byte order
/// mark; other encodings are transcoded from UTF-8.
pub fn write_artifact(df: &DataFrame, target: &ArtifactTarget, stamp: &NaiveDateTime) -> Result<PathBuf> {
    let delimiter = match target.delimiter.as_bytes() {
        [byte] if byte.is_ascii() => *byte,
        _ => {
            return Err(OutputError::InvalidDelimiter {
                value: target.delimiter.clone(),
            });
        }
    };
    let encoding =
        resolve_encoding(&target.encoding).ok_or_else(|| OutputError::UnsupportedEncoding {
            encoding: target.encoding.clone(),
        })?;

    ensure_dir(&target.artifact_dir(), &[])?;
    let path = target.artifact_path(stamp);

    let text = render_csv(df, delimiter, &path)?;
    let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if is_utf8_sig(&target.encoding) {
        bytes.extend_from_slice(UTF8_BOM);
    }
    let (encoded, _, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        warn!(
            encoding = encoding.name(),
            "Some characters cannot be represented in the output encoding"
        );
    }
    bytes.extend_from_slice(&encoded);

    fs::write(&path, &bytes).map_err(|e| OutputError::Io {
        operation: "write artifact",
        path: path.clone(),
        source: e,
    })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Saved processed source"
    );
    Ok(path)
}

fn render_csv(df: &DataFrame, delimiter: u8, path: &Path) -> Result<String> {
    let csv_error = |e: csv::Error| OutputError::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(column_names(df)).map_err(csv_error)?;
    let columns = df.get_columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx)?));
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| OutputError::Io {
        operation: "flush artifact",
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use tabclean_model::parse_run_timestamp;
    use tempfile::tempdir;

    fn target(base: &Path) -> ArtifactTarget {
        ArtifactTarget {
            base: base.to_path_buf(),
            product: "master".to_string(),
            tag: "clients".to_string(),
            date_part: None,
            file_type: "csv".to_string(),
            delimiter: ";".to_string(),
            encoding: "UTF-8-SIG".to_string(),
        }
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("id".into(), vec![1i64, 2]).into_column(),
            Series::new("name".into(), vec![Some("ana; lda"), None]).into_column(),
            Series::new("total".into(), vec![1234.5f64, 0.0]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_artifact_paths() {
        let base = Path::new("/data");
        let stamp = parse_run_timestamp("20240301_101500").unwrap();
        let mut target = target(base);
        assert_eq!(
            target.artifact_path(&stamp),
            Path::new("/data/master/clients/clients_20240301_101500.csv")
        );

        target.date_part = Some("202402".to_string());
        assert_eq!(
            target.artifact_path(&stamp),
            Path::new("/data/master/clients/clients_202402/clients_202402_20240301_101500.csv")
        );
        assert_eq!(target.tag_dir(), Path::new("/data/master/clients"));
    }

    #[test]
    fn test_write_artifact_with_bom() {
        let dir = tempdir().unwrap();
        let stamp = parse_run_timestamp("20240301_101500").unwrap();
        let path = write_artifact(&frame(), &target(dir.path()), &stamp).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text, "id;name;total\n1;\"ana; lda\";1234.5\n2;;0\n");
    }

    #[test]
    fn test_write_artifact_windows_1252() {
        let dir = tempdir().unwrap();
        let stamp = parse_run_timestamp("20240301_101500").unwrap();
        let mut target = target(dir.path());
        target.encoding = "cp1252".to_string();
        let df = DataFrame::new(vec![
            Series::new("nome".into(), vec!["joão"]).into_column(),
        ])
        .unwrap();
        let path = write_artifact(&df, &target, &stamp).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"nome\njo\xe3o\n");
    }

    #[test]
    fn test_invalid_settings() {
        let dir = tempdir().unwrap();
        let stamp = parse_run_timestamp("20240301_101500").unwrap();
        let mut bad_delimiter = target(dir.path());
        bad_delimiter.delimiter = "||".to_string();
        assert!(matches!(
            write_artifact(&frame(), &bad_delimiter, &stamp),
            Err(OutputError::InvalidDelimiter { .. })
        ));

        let mut bad_encoding = target(dir.path());
        bad_encoding.encoding = "klingon".to_string();
        assert!(matches!(
            write_artifact(&frame(), &bad_encoding, &stamp),
            Err(OutputError::UnsupportedEncoding { .. })
        ));
    }
}
