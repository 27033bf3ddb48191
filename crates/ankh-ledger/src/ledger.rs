use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::LedgerError;

/// File-backed word → count ledger.
///
/// The backing JSON file is the only authoritative state; every operation
/// round-trips it. A parking_lot::Mutex serializes the whole
/// read-modify-write-persist cycle so concurrent merges through clones of
/// one handle never drop counts.
pub struct WordLedger {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl WordLedger {
    /// Create a handle for the ledger at `path`. No I/O happens here; a
    /// missing file reads as an empty ledger.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read the full word → count mapping, in first-seen order.
    pub fn load(&self) -> Result<IndexMap<String, u64>, LedgerError> {
        let _guard = self.lock.lock();
        self.read_counts()
    }

    /// Increment each word's count by one per occurrence and rewrite the
    /// backing file. Words never seen before are appended at the tail. A
    /// failed merge leaves the file exactly as it was.
    pub fn merge(&self, words: &[String]) -> Result<(), LedgerError> {
        let _guard = self.lock.lock();

        let mut counts = self.read_counts()?;
        for word in words {
            *counts.entry(word.clone()).or_insert(0) += 1;
        }
        self.write_counts(&counts)?;

        debug!(merged = words.len(), distinct = counts.len(), "ledger merged");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_counts(&self) -> Result<IndexMap<String, u64>, LedgerError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => return Err(LedgerError::Io(e.to_string())),
        };
        let counts = serde_json::from_str(&raw)?;
        Ok(counts)
    }

    /// Write the whole mapping through a temp file in the target
    /// directory, then rename over the old file. Readers see either the
    /// previous state or the new one, never a torn file.
    fn write_counts(&self, counts: &IndexMap<String, u64>) -> Result<(), LedgerError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_owned(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        let json = serde_json::to_string_pretty(counts)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl Clone for WordLedger {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: self.lock.clone(),
        }
    }
}
