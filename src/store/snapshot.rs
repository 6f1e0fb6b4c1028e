//! Snapshot encoding and crash recovery for the file-backed store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::LedgerState;
use crate::engine::StorageError;

/// Write attempts before a failure surfaces to the caller.
const PERSIST_ATTEMPTS: u32 = 3;

fn staging_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Load the snapshot at `path`, discarding any leftover of an interrupted
/// write first: the rename never happened, so the main file still holds
/// the consistent pre-crash state. A missing or empty file is an empty
/// ledger; a corrupt file is an error, never a silent reset.
pub(super) fn load(path: &Path) -> Result<LedgerState, StorageError> {
    let staging = staging_path(path);
    if staging.exists() {
        log::warn!(
            "Discarding interrupted snapshot write: {}",
            staging.display()
        );
        fs::remove_file(&staging)?;
    }

    if !path.exists() {
        return Ok(LedgerState::default());
    }
    let bytes = fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(LedgerState::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write `state` to `path` via a staged file and atomic rename, retrying a
/// bounded number of times. The caller's in-memory state stays untouched
/// until this returns `Ok`.
pub(super) fn persist(path: &Path, state: &LedgerState) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(state)?;

    let mut last_err = None;
    for attempt in 1..=PERSIST_ATTEMPTS {
        match write_staged(path, &bytes) {
            Ok(()) => return Ok(()),
            Err(err) => {
                log::warn!("Snapshot write attempt {attempt}/{PERSIST_ATTEMPTS} failed: {err}");
                last_err = Some(err);
            }
        }
    }

    Err(StorageError::RetriesExhausted {
        attempts: PERSIST_ATTEMPTS,
        source: last_err.unwrap_or_else(|| std::io::Error::other("snapshot write failed")),
    })
}

/// Stage, flush to stable storage, then rename over the live snapshot.
fn write_staged(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let staging = staging_path(path);
    let mut file = fs::File::create(&staging)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&staging, path)?;
    Ok(())
}
