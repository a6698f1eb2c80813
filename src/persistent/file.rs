//! File-backed persistent tier
//!
//! Stores one JSON object per line. Reads scan the file; writes rewrite it
//! through a temporary file that replaces the original.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::PersistentStore;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    key: String,
    value: String,
}

// == File Store ==
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Guards the file; the lock carries no data
    lock: RwLock<()>,
}

impl FileStore {
    // == Open ==
    /// Opens the store at `path`, creating the file and its parent
    /// directories if needed. Existing records are kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        info!("Persistent tier opened at {}", path.display());
        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    #[cfg(test)]
    fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the store file used while rewriting it.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn read_records(&self) -> Result<Vec<StoredRecord>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    fn write_records(&self, records: &[StoredRecord]) -> Result<()> {
        let temp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write();
        let mut records = self.read_records()?;
        match records.iter_mut().find(|r| r.key == key) {
            Some(record) => value.clone_into(&mut record.value),
            None => records.push(StoredRecord {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
        self.write_records(&records)?;
        debug!(key, "persistent put");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.read();
        let reader = BufReader::new(File::open(&self.path)?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: StoredRecord = serde_json::from_str(&line)?;
            if record.key == key {
                return Ok(Some(record.value));
            }
        }
        Ok(None)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.write();
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.key != key);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        debug!(key, "persistent delete");
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.write();
        File::create(&self.path)?;
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, String>> {
        let _guard = self.lock.read();
        Ok(self
            .read_records()?
            .into_iter()
            .map(|r| (r.key, r.value))
            .collect())
    }
}
