// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `testerinfo.run` heartbeat writer (spec §4.7/§5): one JSON file,
//! overwritten every 30 s while a round's worker pool is draining, so
//! the recorder can upsert a `RunnerInfo` row without ever touching
//! the database itself.

use endtoend_core::RunnerInfo;
use std::path::Path;

/// Serialize `info` to `workdir/testerinfo.run`, replacing any previous
/// contents. The recorder treats an absent or empty file as "no
/// update", so a partial write is the only failure mode worth avoiding;
/// writing the whole buffer in one `fs::write` call is sufficient here
/// since both processes share one filesystem, never a network mount.
pub fn write_heartbeat(workdir: &Path, info: &RunnerInfo) -> std::io::Result<()> {
    let contents = serde_json::to_vec(info).unwrap_or_else(|_| b"{}".to_vec());
    std::fs::write(workdir.join("testerinfo.run"), contents)
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
