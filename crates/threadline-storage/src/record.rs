//! Versioned record files and atomic writes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use threadline_core::error::{Result, ThreadlineError};
use threadline_core::types::SchemaVersion;
use tracing::debug;

/// Schema version written into every record file
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// On-disk envelope around a stored record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFile<T> {
    pub schema_version: String,
    pub record: T,
    /// Fields written by newer minor versions
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl<T> RecordFile<T> {
    pub fn new(record: T) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            record,
            extra: HashMap::new(),
        }
    }

    /// Reject records whose major version differs from ours
    pub fn check_version(&self) -> Result<()> {
        let current = SchemaVersion::V1_0;
        match SchemaVersion::parse(&self.schema_version) {
            Some(version) if version.is_compatible(&current) => Ok(()),
            _ => Err(ThreadlineError::UnsupportedSchemaVersion(
                self.schema_version.clone(),
            )),
        }
    }

    pub fn into_record(self) -> T {
        self.record
    }
}

/// Write `record` to `path` via a sibling temp file and a rename
pub(crate) fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ThreadlineError::Storage(format!("Invalid record path: {:?}", path)))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let temp_file = fs::File::create(&temp_path).map_err(|e| {
        ThreadlineError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file: {}", e),
        ))
    })?;
    let mut writer = BufWriter::new(temp_file);
    serde_json::to_writer_pretty(&mut writer, &RecordFile::new(record))?;
    writer.flush()?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ThreadlineError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })?;

    debug!("Wrote record {:?}", path);
    Ok(())
}

/// Read a record file; `Ok(None)` if it does not exist
pub(crate) fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ThreadlineError::Io(e)),
    };

    let file: RecordFile<T> = serde_json::from_reader(BufReader::new(file))?;
    file.check_version()?;
    Ok(Some(file.into_record()))
}

/// Final record files in `dir`, skipping temp files and anything not JSON
pub(crate) fn record_paths(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
        let is_hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(true);
        if is_json && !is_hidden {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
