// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::model::SessionState;

const SESSION_STATE_FILENAME: &str = "kqool-session.json";
const FINAL_QUERY_FILENAME: &str = "final.kql";
const FRESH_DIR_ATTEMPTS: usize = 8;

static FRESH_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    MissingSession { path: PathBuf },
    SymlinkRefused { path: PathBuf },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::MissingSession { path } => {
                write!(f, "no session state at {path:?} (start a session first)")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MissingSession { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Handle to one session's persisted state: a directory holding `kqool-session.json`.
///
/// Every operation reads the file fully before acting and replaces it atomically after.
#[derive(Debug, Clone)]
pub struct SessionFile {
    root: PathBuf,
    durability: WriteDurability,
}

impl SessionFile {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), durability: WriteDurability::default() }
    }

    /// Creates a new, empty session directory under the system temp dir.
    ///
    /// The directory is created exclusively, so two calls never share a handle.
    pub fn create_in_temp_dir() -> Result<Self, StoreError> {
        let base = std::env::temp_dir();
        let mut last_err = None;
        for _ in 0..FRESH_DIR_ATTEMPTS {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let seq = FRESH_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let root = base.join(format!("kqool-session-{}-{nanos}-{seq}", std::process::id()));
            match fs::create_dir(&root) {
                Ok(()) => return Ok(Self::new(root)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    last_err = Some(StoreError::Io { path: root, source: err });
                }
                Err(source) => return Err(StoreError::Io { path: root, source }),
            }
        }
        Err(last_err.unwrap_or_else(|| StoreError::Io {
            path: base,
            source: io::Error::other("no fresh session directory available"),
        }))
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(SESSION_STATE_FILENAME)
    }

    pub fn final_query_path(&self) -> PathBuf {
        self.root.join(FINAL_QUERY_FILENAME)
    }

    pub fn exists(&self) -> bool {
        self.state_path().is_file()
    }

    pub fn load_state(&self) -> Result<SessionState, StoreError> {
        let path = self.state_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::MissingSession { path });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Json { path, source })
    }

    pub fn save_state(&self, state: &SessionState) -> Result<(), StoreError> {
        let path = self.state_path();
        let json = serde_json::to_string_pretty(state)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;

        write_atomic(&self.root, &path, format!("{json}\n").as_bytes(), self.durability)?;
        debug!(
            path = %path.display(),
            selections = state.selections().len(),
            "saved session state"
        );
        Ok(())
    }

    pub fn write_final_query(&self, query: &str) -> Result<PathBuf, StoreError> {
        let path = self.final_query_path();
        write_atomic(&self.root, &path, query.as_bytes(), self.durability)?;
        Ok(path)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io { path: root.to_path_buf(), source })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused { path: path.to_path_buf() });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = root.join(format!(".kqool.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;

    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: tmp_path, source });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
    }
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root)
                .map_err(|source| StoreError::Io { path: root.to_path_buf(), source })?;
            dir.sync_all().map_err(|source| StoreError::Io { path: root.to_path_buf(), source })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
