// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent insert-by-natural-key helpers and read paths for each
//! entity in the data model (spec §3, §4.7). Every insert here is the
//! recorder's write path: a `Request` row plus its `Action`,
//! `Verification`, `RequestState`, and `PingResult` children, built from
//! one parsed artifact.

use crate::error::DbError;
use endtoend_core::{
    Action, LockedRequest, PingResult, Request, RequestState, RequestType, RequestUuid,
    RunnerInfo, RttStats, Verification,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

/// Insert a `Request` row, ignoring the call if its natural key
/// (`port1`, `port2`, `vlan`, `requesttype`, `fileloc`) already exists
/// (spec §4.7: recorder writes must be idempotent across reruns of a
/// `.json.dbdone` file).
pub async fn insert_request(pool: &SqlitePool, request: &Request) -> Result<(), DbError> {
    sqlx::query(
        "INSERT OR IGNORE INTO requests
         (uuid, port1, port2, vlan, site1, site2, requesttype, finalstate, pathfindissue,
          failure, fileloc, insertdate, updatedate)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(request.uuid.as_uuid().to_string())
    .bind(&request.port1)
    .bind(&request.port2)
    .bind(&request.vlan)
    .bind(&request.site1)
    .bind(&request.site2)
    .bind(request.request_type.as_str())
    .bind(request.finalstate as i64)
    .bind(request.pathfindissue as i64)
    .bind(&request.failure)
    .bind(&request.fileloc)
    .bind(request.insertdate)
    .bind(request.updatedate)
    .execute(pool)
    .await?;
    Ok(())
}

/// Update `fileloc`/`updatedate` on an existing `Request`, used by the
/// archiver once a file has moved (spec §4.6).
pub async fn update_request_fileloc(
    pool: &SqlitePool,
    uuid: RequestUuid,
    fileloc: &str,
    updatedate: i64,
) -> Result<(), DbError> {
    sqlx::query("UPDATE requests SET fileloc = ?, updatedate = ? WHERE uuid = ?")
        .bind(fileloc)
        .bind(updatedate)
        .bind(uuid.as_uuid().to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_action(pool: &SqlitePool, action: &Action) -> Result<(), DbError> {
    sqlx::query(
        "INSERT OR IGNORE INTO actions (uuid, request_uuid, action, starttime)
         VALUES (?, ?, ?, ?)",
    )
    .bind(action.uuid.as_uuid().to_string())
    .bind(action.request_uuid.as_uuid().to_string())
    .bind(action.phase.as_str())
    .bind(action.starttime)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_verification(pool: &SqlitePool, verification: &Verification) -> Result<(), DbError> {
    sqlx::query(
        "INSERT OR IGNORE INTO verification
         (uuid, request_uuid, action, site, urn, netstatus, verified)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(verification.uuid.as_uuid().to_string())
    .bind(verification.request_uuid.as_uuid().to_string())
    .bind(verification.phase.as_str())
    .bind(&verification.site)
    .bind(&verification.urn)
    .bind(&verification.netstatus)
    .bind(verification.verified as i64)
    .execute(pool)
    .await?;
    Ok(())
}

/// `requeststates` has no natural-key uniqueness (spec §4.3's analyzer
/// output is an ordered sequence, not a deduplicated set); every row the
/// analyzer emits is appended.
pub async fn insert_request_state(pool: &SqlitePool, state: &RequestState) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO requeststates
         (request_uuid, action, state, configstate, entertime, totaltime, sincestart)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(state.request_uuid.as_uuid().to_string())
    .bind(state.phase.as_str())
    .bind(&state.state)
    .bind(state.configstate.as_str())
    .bind(state.entertime)
    .bind(state.totaltime)
    .bind(state.sincestart)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_ping_result(pool: &SqlitePool, ping: &PingResult) -> Result<(), DbError> {
    let rtt = ping.rtt.unwrap_or(RttStats { min: 0.0, avg: 0.0, max: 0.0, mdev: 0.0 });
    sqlx::query(
        "INSERT OR IGNORE INTO pingresults
         (uuid, request_uuid, action, ipto, ipfrom, vlanfrom, vlanto, failed,
          transmitted, received, packetloss, rttmin, rttavg, rttmax, rttmdev)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ping.uuid.as_uuid().to_string())
    .bind(ping.request_uuid.as_uuid().to_string())
    .bind(ping.phase.as_str())
    .bind(&ping.ipto)
    .bind(&ping.ipfrom)
    .bind(&ping.vlanfrom)
    .bind(&ping.vlanto)
    .bind(ping.failed as i64)
    .bind(ping.transmitted)
    .bind(ping.received)
    .bind(ping.packetloss)
    .bind(rtt.min)
    .bind(rtt.avg)
    .bind(rtt.max)
    .bind(rtt.mdev)
    .execute(pool)
    .await?;
    Ok(())
}

/// Upsert the singleton heartbeat row (spec §4.7, "Runner heartbeat");
/// always written at the fixed id `1`.
pub async fn upsert_runner_info(pool: &SqlitePool, info: &RunnerInfo, updatedate: i64) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO runnerinfo
         (id, alive, totalworkers, totalqueue, remainingqueue, lockedrequests, starttime, nextrun, updatedate)
         VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
           alive = excluded.alive,
           totalworkers = excluded.totalworkers,
           totalqueue = excluded.totalqueue,
           remainingqueue = excluded.remainingqueue,
           lockedrequests = excluded.lockedrequests,
           starttime = excluded.starttime,
           nextrun = excluded.nextrun,
           updatedate = excluded.updatedate",
    )
    .bind(info.alive as i64)
    .bind(info.totalworkers)
    .bind(info.totalqueue)
    .bind(info.remainingqueue)
    .bind(info.lockedrequests)
    .bind(info.starttime)
    .bind(info.nextrun)
    .bind(updatedate)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_locked_request(pool: &SqlitePool, locked: &LockedRequest) -> Result<(), DbError> {
    sqlx::query(
        "INSERT OR IGNORE INTO lockedrequests (request_uuid, fileloc, insertdate)
         VALUES (?, ?, ?)",
    )
    .bind(locked.request_uuid.as_uuid().to_string())
    .bind(&locked.fileloc)
    .bind(locked.insertdate)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a `LockedRequest` row, used by the recorder's reconciliation
/// pass once a pair's file is gone or reaches a terminal condition
/// (spec §4.7, "Locked-request reconciliation").
pub async fn delete_locked_request(pool: &SqlitePool, request_uuid: RequestUuid) -> Result<(), DbError> {
    sqlx::query("DELETE FROM lockedrequests WHERE request_uuid = ?")
        .bind(request_uuid.as_uuid().to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_locked_requests(pool: &SqlitePool) -> Result<Vec<LockedRequest>, DbError> {
    let rows = sqlx::query("SELECT request_uuid, fileloc, insertdate FROM lockedrequests")
        .fetch_all(pool)
        .await?;
    rows.iter().map(locked_request_from_row).collect()
}

fn locked_request_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LockedRequest, DbError> {
    let uuid_text: String = row.try_get("request_uuid")?;
    Ok(LockedRequest {
        request_uuid: parse_request_uuid(&uuid_text)?,
        fileloc: row.try_get("fileloc")?,
        insertdate: row.try_get("insertdate")?,
    })
}

pub async fn get_request(pool: &SqlitePool, uuid: RequestUuid) -> Result<Option<Request>, DbError> {
    let row = sqlx::query(
        "SELECT uuid, port1, port2, vlan, site1, site2, requesttype, finalstate, pathfindissue,
                failure, fileloc, insertdate, updatedate
         FROM requests WHERE uuid = ?",
    )
    .bind(uuid.as_uuid().to_string())
    .fetch_optional(pool)
    .await?;
    row.map(|row| request_from_row(&row)).transpose()
}

/// Look up a `Request` by its natural key (spec §4.7: the recorder
/// reuses a file's existing `uuid` across reruns instead of minting a
/// fresh one each time it re-parses a not-yet-archived artifact).
pub async fn get_request_by_natural_key(
    pool: &SqlitePool,
    port1: &str,
    port2: &str,
    vlan: &str,
    request_type: RequestType,
    fileloc: &str,
) -> Result<Option<Request>, DbError> {
    let row = sqlx::query(
        "SELECT uuid, port1, port2, vlan, site1, site2, requesttype, finalstate, pathfindissue,
                failure, fileloc, insertdate, updatedate
         FROM requests
         WHERE port1 = ? AND port2 = ? AND vlan = ? AND requesttype = ? AND fileloc = ?",
    )
    .bind(port1)
    .bind(port2)
    .bind(vlan)
    .bind(request_type.as_str())
    .bind(fileloc)
    .fetch_optional(pool)
    .await?;
    row.map(|row| request_from_row(&row)).transpose()
}

fn request_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Request, DbError> {
    let uuid_text: String = row.try_get("uuid")?;
    let requesttype: String = row.try_get("requesttype")?;
    let finalstate: i64 = row.try_get("finalstate")?;
    let pathfindissue: i64 = row.try_get("pathfindissue")?;
    Ok(Request {
        uuid: parse_request_uuid(&uuid_text)?,
        port1: row.try_get("port1")?,
        port2: row.try_get("port2")?,
        vlan: row.try_get("vlan")?,
        site1: row.try_get("site1")?,
        site2: row.try_get("site2")?,
        request_type: RequestType::from_str(&requesttype)
            .map_err(|e| DbError::Malformed(e.to_string()))?,
        finalstate: finalstate != 0,
        pathfindissue: pathfindissue != 0,
        failure: row.try_get("failure")?,
        fileloc: row.try_get("fileloc")?,
        insertdate: row.try_get("insertdate")?,
        updatedate: row.try_get("updatedate")?,
    })
}

fn parse_request_uuid(text: &str) -> Result<RequestUuid, DbError> {
    uuid::Uuid::parse_str(text)
        .map(RequestUuid::from)
        .map_err(|e| DbError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
