//! Key table storage.
//!
//! A key table maps raw values to their identifiers. Each table lives in
//! `{dir}/{name}.json` as a flat JSON object.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MaskError, Result};

/// Directory of key tables.
#[derive(Debug, Clone)]
pub struct KeyTableStore {
    dir: PathBuf,
}

impl KeyTableStore {
    /// Open a store, creating its directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| MaskError::Io {
            operation: "create directory",
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of a key table file.
    pub fn table_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.trim().is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        if !valid {
            return Err(MaskError::InvalidKeyTableName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Read a key table. A table that was never written is empty.
    pub fn load(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let path = self.table_path(name)?;
        read_table(&path)
    }

    /// Start a read-modify-write of a key table.
    pub fn begin(&self, name: &str) -> Result<KeyTableTransaction> {
        let path = self.table_path(name)?;
        let entries = read_table(&path)?;
        debug!(table = name, entries = entries.len(), "Loaded key table");
        Ok(KeyTableTransaction::new(name.to_string(), path, entries))
    }
}

fn read_table(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(MaskError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&text).map_err(|e| MaskError::InvalidKeyTable {
        path: path.to_path_buf(),
        source: e,
    })
}

/// An open key table.
///
/// Identifiers handed out by [`identifier_for`](Self::identifier_for) only
/// become permanent on [`commit`](Self::commit). Dropping the transaction
/// discards them.
#[derive(Debug)]
pub struct KeyTableTransaction {
    name: String,
    path: PathBuf,
    entries: BTreeMap<String, String>,
    issued: HashSet<String>,
    added: usize,
}

impl KeyTableTransaction {
    fn new(name: String, path: PathBuf, entries: BTreeMap<String, String>) -> Self {
        let issued = entries.values().cloned().collect();
        Self {
            name,
            path,
            entries,
            issued,
            added: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers created since the table was loaded.
    pub fn added(&self) -> usize {
        self.added
    }

    /// The identifier of a raw value, created on first sight.
    pub fn identifier_for(&mut self, raw: &str) -> String {
        if let Some(id) = self.entries.get(raw) {
            return id.clone();
        }
        let id = loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if self.issued.insert(candidate.clone()) {
                break candidate;
            }
        };
        self.entries.insert(raw.to_string(), id.clone());
        self.added += 1;
        id
    }

    /// Persist the table, replacing the previous file atomically.
    ///
    /// Returns the number of identifiers added by this transaction.
    pub fn commit(self) -> Result<usize> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| MaskError::Serialization { source: e })?;
        let temp_path = self.path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|e| MaskError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(json.as_bytes()).map_err(|e| MaskError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| MaskError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| MaskError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;

        info!(
            table = %self.name,
            entries = self.entries.len(),
            added = self.added,
            "Saved key table to {}",
            self.path.display()
        );
        Ok(self.added)
    }
}
