// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration (spec §6.4/§10.3): a `serde`-deserializable struct
//! tree loaded from TOML by a caller (the `tester`/`bootstrap` binaries),
//! with cross-field validation run once after deserialization.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

fn default_maxpairs() -> usize {
    100
}

fn default_totalthreads() -> usize {
    4
}

fn default_ping_packetsize() -> u32 {
    56
}

fn default_ping_interval() -> u32 {
    5
}

fn default_ping_duration() -> u32 {
    60
}

fn default_httpretries_retries() -> u32 {
    3
}

fn default_httpretries_timeout() -> u64 {
    30
}

fn default_run_interval() -> u64 {
    3600
}

fn default_sleep_between_runs() -> u64 {
    5
}

/// One statically-configured endpoint (spec §4.1/§6.4, `entries` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    pub site: String,
    #[serde(default)]
    pub ipv6_prefix: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Post-enumeration include/exclude filter (spec §4.1/§6.4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub include: HashSet<String>,
    #[serde(default)]
    pub exclude: HashSet<String>,
}

/// Per-phase deadlines, in seconds (spec §6.4 `timeouts.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timeouts {
    pub create: i64,
    pub cancel: i64,
    pub reprovision: i64,
    pub modify: i64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: 1800,
            cancel: 600,
            reprovision: 600,
            modify: 600,
        }
    }
}

/// Manifest/validation fetch retry policy (spec §6.4 `httpretries.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpRetries {
    #[serde(default = "default_httpretries_retries")]
    pub retries: u32,
    #[serde(default = "default_httpretries_timeout")]
    pub timeout: u64,
}

impl Default for HttpRetries {
    fn default() -> Self {
        Self {
            retries: default_httpretries_retries(),
            timeout: default_httpretries_timeout(),
        }
    }
}

/// Ping-probe sizing (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PingConfig {
    #[serde(default = "default_ping_packetsize")]
    pub packetsize: u32,
    #[serde(default = "default_ping_interval")]
    pub interval: u32,
    #[serde(default = "default_ping_duration")]
    pub duration: u32,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            packetsize: default_ping_packetsize(),
            interval: default_ping_interval(),
            duration: default_ping_duration(),
        }
    }
}

/// The submission-template family selector (spec §6.4 `submissiontemplate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionTemplate {
    Nettest,
    L3Request,
}

/// Root configuration structure (spec §6.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub entries: Option<HashMap<String, EntryConfig>>,
    #[serde(default)]
    pub entriesdynamic: Option<String>,
    #[serde(default)]
    pub entriessitename: Option<String>,
    #[serde(default)]
    pub vlans: Option<Vec<String>>,
    #[serde(default)]
    pub vlansto: Option<Vec<String>>,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub submissiontemplate: Option<SubmissionTemplate>,
    #[serde(default)]
    pub modifycreate: bool,
    #[serde(default)]
    pub modify: bool,
    #[serde(default)]
    pub reprovision: bool,
    #[serde(default)]
    pub archive_if_failure: bool,
    #[serde(default)]
    pub ignoreping: bool,
    #[serde(default)]
    pub nothreading: bool,
    #[serde(default = "default_totalthreads")]
    pub total_threads: usize,
    #[serde(default = "default_maxpairs")]
    pub maxpairs: usize,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub httpretries: HttpRetries,
    #[serde(default)]
    pub ping: PingConfig,
    #[serde(default = "default_run_interval")]
    pub run_interval: u64,
    #[serde(default = "default_sleep_between_runs")]
    pub sleep_between_runs: u64,
    pub workdir: PathBuf,
    #[serde(default)]
    pub mappings: HashMap<String, String>,
    #[serde(default)]
    pub configlocation: Option<String>,
}

/// Errors surfaced while validating a deserialized `Config` (spec §7,
/// "Config error").
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("entries and entriesdynamic are mutually exclusive")]
    BothEntrySourcesSet,

    #[error("vlans is set without both entries and vlansto")]
    VlansWithoutEntriesAndVlansto,

    #[error("entries and entriessitename are mutually exclusive")]
    BothEntriesAndEntriessitename,

    #[error("total_threads must be at least 1")]
    ZeroThreads,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl Config {
    /// Parse and validate a TOML document (spec §10.3).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field validation (spec §4.1 step 2, §9a).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_some() && self.entriesdynamic.is_some() {
            return Err(ConfigError::BothEntrySourcesSet);
        }
        if self.entries.is_some() && self.entriessitename.is_some() {
            return Err(ConfigError::BothEntriesAndEntriessitename);
        }
        if self.vlans.is_some() && (self.entries.is_none() || self.vlansto.is_none()) {
            return Err(ConfigError::VlansWithoutEntriesAndVlansto);
        }
        if self.total_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if let Some(ranges) = &self.vlans {
            for r in ranges {
                parse_vlan_range(r)?;
            }
        }
        if let Some(entries) = &self.entries {
            if self.submissiontemplate == Some(SubmissionTemplate::L3Request) {
                for (urn, entry) in entries {
                    if entry.ipv6_prefix.is_none() {
                        return Err(CoreError::MissingIpv6Prefix(urn.clone()).into());
                    }
                }
            }
        }
        Ok(())
    }
}

/// One inclusive VLAN id, or the literal `"any"` (spec §4.1 step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VlanId {
    Any,
    Numeric(u32),
}

impl std::fmt::Display for VlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VlanId::Any => write!(f, "any"),
            VlanId::Numeric(n) => write!(f, "{n}"),
        }
    }
}

/// Parse one `vlans` entry: `"any"`, a bare number, or an inclusive
/// `"A-B"` range (spec §4.1 step 5). Returns the expanded list of ids.
pub fn parse_vlan_range(token: &str) -> Result<Vec<VlanId>, CoreError> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("any") {
        return Ok(vec![VlanId::Any]);
    }
    if let Some((lo, hi)) = token.split_once('-') {
        let lo: u32 = lo
            .trim()
            .parse()
            .map_err(|_| CoreError::MalformedVlanRange(token.to_string()))?;
        let hi: u32 = hi
            .trim()
            .parse()
            .map_err(|_| CoreError::MalformedVlanRange(token.to_string()))?;
        if lo > hi {
            return Err(CoreError::MalformedVlanRange(token.to_string()));
        }
        return Ok((lo..=hi).map(VlanId::Numeric).collect());
    }
    let n: u32 = token
        .parse()
        .map_err(|_| CoreError::MalformedVlanRange(token.to_string()))?;
    Ok(vec![VlanId::Numeric(n)])
}

/// Expand a whole `vlans` list (spec §4.1 step 5); `None` means "the
/// single literal `any`" (no `vlans` key configured at all).
pub fn expand_vlans(vlans: Option<&[String]>) -> Result<Vec<VlanId>, CoreError> {
    match vlans {
        None => Ok(vec![VlanId::Any]),
        Some(ranges) => {
            let mut out = Vec::new();
            for r in ranges {
                out.extend(parse_vlan_range(r)?);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
