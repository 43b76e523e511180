// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive filesystem operations: date-bucketed destination paths and
//! the atomic move off the work directory (spec §4.6, §6.3).

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The 3-day retention threshold named in spec §4.6 as a literal
/// constant, not a configuration knob.
pub const STALE_AGE_SECONDS: i64 = 259_200;

/// Build `workdir/archived/YYYY-MM-DD/<epoch>-<original file name>`.
///
/// The date bucket is `UTC(insertdate)`; the numeric filename prefix is
/// `now`, the current UTC time at the moment of the move, not
/// `insertdate` — this is what actually prevents same-day collisions
/// between artifacts sharing a stem (spec §4.6: the two are explicitly
/// orthogonal).
pub fn archive_destination(workdir: &Path, insertdate: i64, now: i64, original: &Path) -> PathBuf {
    let date = DateTime::<Utc>::from_timestamp(insertdate, 0).unwrap_or_else(Utc::now);
    let bucket = date.format("%Y-%m-%d").to_string();
    let file_name = original.file_name().and_then(|n| n.to_str()).unwrap_or("artifact.json");
    workdir.join("archived").join(bucket).join(format!("{now}-{file_name}"))
}

/// Move `original` to its archive destination, creating the date-bucket
/// directory as needed. Returns the destination path so the caller can
/// update the artifact's `fileloc` column.
pub fn archive_move(
    workdir: &Path,
    insertdate: i64,
    now: i64,
    original: &Path,
) -> Result<PathBuf, ArchiveError> {
    let destination = archive_destination(workdir, insertdate, now, original);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(original, &destination)?;
    Ok(destination)
}

/// Whether a run at `insertdate` has crossed the 3-day staleness
/// threshold as of `now` (spec §4.6's `OKARCHIVE` and archived-lock
/// rows).
pub fn is_stale(insertdate: i64, now: i64) -> bool {
    now - insertdate >= STALE_AGE_SECONDS
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
