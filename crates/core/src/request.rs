// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Request`: one full lifecycle run against the Orchestrator.

use crate::ids::RequestUuid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The submission-template family used for a `Request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestType {
    GuaranteedCapped,
    BestEffort,
    Nettest,
    L3Request,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::GuaranteedCapped => "guaranteedCapped",
            RequestType::BestEffort => "bestEffort",
            RequestType::Nettest => "nettest",
            RequestType::L3Request => "l3_request",
        }
    }

    /// Only `guaranteedCapped` intents are eligible for modify (spec §4.2,
    /// "Phase driver (modify, modifycreate)").
    pub fn modify_eligible(&self) -> bool {
        matches!(self, RequestType::GuaranteedCapped)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guaranteedCapped" => Ok(RequestType::GuaranteedCapped),
            "bestEffort" => Ok(RequestType::BestEffort),
            "nettest" => Ok(RequestType::Nettest),
            "l3_request" => Ok(RequestType::L3Request),
            other => Err(crate::error::CoreError::UnknownRequestType(other.to_string())),
        }
    }
}

/// One full lifecycle run against the Orchestrator (spec Data Model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub uuid: RequestUuid,
    pub port1: String,
    pub port2: String,
    pub vlan: String,
    pub site1: String,
    pub site2: String,
    pub request_type: RequestType,
    pub finalstate: bool,
    pub pathfindissue: bool,
    #[serde(default)]
    pub failure: String,
    pub fileloc: String,
    pub insertdate: i64,
    pub updatedate: i64,
}

impl Request {
    /// Natural key used for idempotent inserts (spec §4.7): everything
    /// except the generated uuid and audit timestamps (`insertdate`,
    /// `updatedate`).
    pub fn natural_key(&self) -> (&str, &str, &str, RequestType, &str) {
        (&self.port1, &self.port2, &self.vlan, self.request_type, &self.fileloc)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
