// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-lock protocol between the Tester (producer) and the Recorder
//! (consumer): cross-process coordination through the filesystem alone,
//! without a shared database transaction (spec §4.4).
//!
//! A pair artifact's suffix (`.json.lock` / `.json` / `.json.dbdone`)
//! is the only state it carries; whichever process holds the suffix
//! owns the next transition. Lock acquisition uses
//! `OpenOptions::create_new`, never a check-then-create race — the
//! presence check in [`ArtifactPaths::any_exists`] is a fast-path
//! optimisation only.

use endtoend_core::Pair;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("a pair artifact is already present for this pair")]
    AlreadyPresent,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The three suffix states a pair artifact can be in at any one time
/// (spec §4.4's table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSuffix {
    Lock,
    Json,
    DbDone,
}

impl ArtifactSuffix {
    fn extension(&self) -> &'static str {
        match self {
            ArtifactSuffix::Lock => "json.lock",
            ArtifactSuffix::Json => "json",
            ArtifactSuffix::DbDone => "json.dbdone",
        }
    }
}

/// The three candidate paths for one pair's artifact under a work
/// directory, keyed by its normalised stem.
pub struct ArtifactPaths {
    workdir: PathBuf,
    stem: String,
}

impl ArtifactPaths {
    pub fn new(workdir: impl Into<PathBuf>, pair: &Pair) -> Self {
        Self { workdir: workdir.into(), stem: pair.stem() }
    }

    pub fn path(&self, suffix: ArtifactSuffix) -> PathBuf {
        self.workdir.join(format!("{}.{}", self.stem, suffix.extension()))
    }

    /// True if any of the three suffix files exists (spec §4.2 step 1 /
    /// §4.4 invariant: the Tester must not dequeue a pair for which any
    /// suffix file exists).
    pub fn any_exists(&self) -> bool {
        [ArtifactSuffix::Lock, ArtifactSuffix::Json, ArtifactSuffix::DbDone]
            .iter()
            .any(|s| self.path(*s).exists())
    }

    /// Atomically create the `.json.lock` file, writing `worker_id` and
    /// `timestamp` into it (spec §4.2 step 2). Fails with
    /// [`ArtifactError::AlreadyPresent`] if a racing worker won, which is
    /// the actual mutual-exclusion guarantee — `any_exists` is only a
    /// fast-path skip.
    pub fn acquire_lock(&self, worker_id: &str, timestamp: i64) -> Result<(), ArtifactError> {
        if let Some(parent) = self.workdir.parent() {
            let _ = parent;
        }
        fs::create_dir_all(&self.workdir)?;
        let lock_path = self.path(ArtifactSuffix::Lock);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ArtifactError::AlreadyPresent)
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::to_writer(&mut file, &LockContents { worker_id, timestamp })?;
        Ok(())
    }

    /// Write the finished `<stem>.json` result and remove the lock
    /// (spec §4.2 step 5). `contents` is the already-serialised
    /// `PairRun` response object.
    pub fn finish(&self, contents: &[u8]) -> Result<(), ArtifactError> {
        let json_path = self.path(ArtifactSuffix::Json);
        fs::write(&json_path, contents)?;
        let lock_path = self.path(ArtifactSuffix::Lock);
        if lock_path.exists() {
            fs::remove_file(&lock_path)?;
        }
        Ok(())
    }

    /// Release the lock without writing a result (teardown / panic
    /// recovery path).
    pub fn release_lock(&self) -> Result<(), ArtifactError> {
        let lock_path = self.path(ArtifactSuffix::Lock);
        if lock_path.exists() {
            fs::remove_file(&lock_path)?;
        }
        Ok(())
    }

    /// Rename the `.json` file to `.json.dbdone` (recorder, non-terminal
    /// run: "do not retry yet" sentinel per spec §4.4/§4.6).
    pub fn mark_db_done(&self) -> Result<PathBuf, ArtifactError> {
        let from = self.path(ArtifactSuffix::Json);
        let to = self.path(ArtifactSuffix::DbDone);
        fs::rename(&from, &to)?;
        Ok(to)
    }

    /// Remove a `.json.dbdone` sentinel once its pair reaches a terminal
    /// condition or exceeds retention (spec §4.4).
    pub fn clear_db_done(&self) -> Result<(), ArtifactError> {
        let path = self.path(ArtifactSuffix::DbDone);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct LockContents<'a> {
    worker_id: &'a str,
    timestamp: i64,
}

/// Open the `.json` or `.json.dbdone` file for reading, whichever of the
/// two is present (the recorder reads both; an absent pair returns
/// `Ok(None)`).
pub fn open_result_file(paths: &ArtifactPaths) -> Result<Option<File>, ArtifactError> {
    for suffix in [ArtifactSuffix::Json, ArtifactSuffix::DbDone] {
        let path = paths.path(suffix);
        if path.exists() {
            return Ok(Some(File::open(path)?));
        }
    }
    Ok(None)
}

/// True if `path`'s filename ends with any of the three tracked
/// suffixes, used by directory scans in the recorder.
pub fn is_artifact_path(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    name.ends_with(".json") || name.ends_with(".json.lock") || name.ends_with(".json.dbdone")
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
