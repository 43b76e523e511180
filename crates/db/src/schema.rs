// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table DDL, transcribed from the original `dbcalls.py` `create_*`
//! literals (spec §4.7a). Column names and constraints are preserved;
//! types are adapted from MySQL to SQLite (`SERIAL` → `INTEGER PRIMARY
//! KEY AUTOINCREMENT`, `TIMESTAMP ... ON UPDATE CURRENT_TIMESTAMP` →
//! plain `INTEGER` epoch-seconds columns, since SQLite has no
//! `ON UPDATE` trigger clause and this crate writes `updatedate`
//! explicitly on every mutation instead).
//!
//! Every statement is `CREATE TABLE IF NOT EXISTS`, so running the
//! bootstrapper against an already-initialized database is a no-op
//! (spec §7a: multi-statement atomicity for the once-only bootstrap is
//! gated by this idempotent DDL, not a transaction).

pub const CREATE_REQUESTS: &str = "CREATE TABLE IF NOT EXISTS requests (
    uuid TEXT PRIMARY KEY,
    port1 TEXT NOT NULL,
    port2 TEXT NOT NULL,
    vlan TEXT NOT NULL,
    site1 TEXT NOT NULL,
    site2 TEXT NOT NULL,
    requesttype TEXT NOT NULL,
    finalstate INTEGER NOT NULL CHECK (finalstate IN (0,1)),
    pathfindissue INTEGER NOT NULL CHECK (pathfindissue IN (0,1)),
    failure TEXT NOT NULL DEFAULT '',
    fileloc TEXT NOT NULL,
    insertdate INTEGER NOT NULL,
    updatedate INTEGER NOT NULL
)";

pub const CREATE_REQUESTS_NATURAL_KEY: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS requests_natural_key
     ON requests (port1, port2, vlan, requesttype, fileloc)";

pub const CREATE_ACTIONS: &str = "CREATE TABLE IF NOT EXISTS actions (
    uuid TEXT PRIMARY KEY,
    request_uuid TEXT NOT NULL REFERENCES requests(uuid),
    action TEXT NOT NULL,
    starttime INTEGER NOT NULL
)";

pub const CREATE_ACTIONS_NATURAL_KEY: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS actions_natural_key
     ON actions (request_uuid, action, starttime)";

pub const CREATE_VERIFICATION: &str = "CREATE TABLE IF NOT EXISTS verification (
    uuid TEXT PRIMARY KEY,
    request_uuid TEXT NOT NULL REFERENCES requests(uuid),
    action TEXT NOT NULL,
    site TEXT NOT NULL,
    urn TEXT NOT NULL,
    netstatus TEXT NOT NULL,
    verified INTEGER NOT NULL CHECK (verified IN (0,1))
)";

pub const CREATE_VERIFICATION_NATURAL_KEY: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS verification_natural_key
     ON verification (request_uuid, action, site, urn, netstatus)";

pub const CREATE_REQUESTSTATES: &str = "CREATE TABLE IF NOT EXISTS requeststates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_uuid TEXT NOT NULL REFERENCES requests(uuid),
    action TEXT NOT NULL,
    state TEXT NOT NULL,
    configstate TEXT NOT NULL,
    entertime INTEGER NOT NULL,
    totaltime INTEGER NOT NULL,
    sincestart INTEGER NOT NULL
)";

pub const CREATE_PINGRESULTS: &str = "CREATE TABLE IF NOT EXISTS pingresults (
    uuid TEXT PRIMARY KEY,
    request_uuid TEXT NOT NULL REFERENCES requests(uuid),
    action TEXT NOT NULL,
    ipto TEXT NOT NULL,
    ipfrom TEXT NOT NULL,
    vlanfrom TEXT NOT NULL,
    vlanto TEXT NOT NULL,
    failed INTEGER NOT NULL CHECK (failed IN (0,1)),
    transmitted INTEGER NOT NULL,
    received INTEGER NOT NULL,
    packetloss REAL NOT NULL,
    rttmin REAL NOT NULL,
    rttavg REAL NOT NULL,
    rttmax REAL NOT NULL,
    rttmdev REAL NOT NULL
)";

pub const CREATE_PINGRESULTS_NATURAL_KEY: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS pingresults_natural_key
     ON pingresults (request_uuid, action, ipfrom, ipto)";

pub const CREATE_RUNNERINFO: &str = "CREATE TABLE IF NOT EXISTS runnerinfo (
    id INTEGER PRIMARY KEY,
    alive INTEGER NOT NULL,
    totalworkers INTEGER NOT NULL,
    totalqueue INTEGER NOT NULL,
    remainingqueue INTEGER NOT NULL,
    lockedrequests INTEGER NOT NULL,
    starttime INTEGER NOT NULL,
    nextrun INTEGER NOT NULL,
    updatedate INTEGER NOT NULL
)";

pub const CREATE_LOCKEDREQUESTS: &str = "CREATE TABLE IF NOT EXISTS lockedrequests (
    request_uuid TEXT PRIMARY KEY REFERENCES requests(uuid),
    fileloc TEXT NOT NULL,
    insertdate INTEGER NOT NULL
)";

pub const CREATE_STATEORDER: &str = "CREATE TABLE IF NOT EXISTS stateorder (
    state TEXT NOT NULL,
    action TEXT NOT NULL,
    configstate TEXT NOT NULL,
    orderid INTEGER NOT NULL,
    PRIMARY KEY (state, action, configstate)
)";

/// All DDL statements, in dependency order (tables before the indexes
/// and foreign keys that reference them).
pub const ALL: &[&str] = &[
    CREATE_REQUESTS,
    CREATE_REQUESTS_NATURAL_KEY,
    CREATE_ACTIONS,
    CREATE_ACTIONS_NATURAL_KEY,
    CREATE_VERIFICATION,
    CREATE_VERIFICATION_NATURAL_KEY,
    CREATE_REQUESTSTATES,
    CREATE_PINGRESULTS,
    CREATE_PINGRESULTS_NATURAL_KEY,
    CREATE_RUNNERINFO,
    CREATE_LOCKEDREQUESTS,
    CREATE_STATEORDER,
];
