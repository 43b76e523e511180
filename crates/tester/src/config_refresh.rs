// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote configuration refresh (spec §5, §9a): best-effort, falls
//! back to the last known good config on any failure. Refreshed every
//! 24 h, or every 1 h while any site lookup in the current round
//! resolved to `"UNKNOWN"`. The staleness check compares the last
//! successful fetch against the *current* clock reading — comparing it
//! against itself can never be true and would silently disable the
//! refresh entirely, a defect in the original this design corrects.
//!
//! `configlocation` is reached only through [`ConfigFetcher`], the same
//! trait-boundary pattern as the Orchestrator and edge-agent clients:
//! no concrete HTTP implementation lives in this workspace.

use async_trait::async_trait;
use endtoend_core::{Clock, Config, ConfigError};
use thiserror::Error;
use tracing::warn;

const REFRESH_INTERVAL_SECS: i64 = 86_400;
const DEGRADED_REFRESH_INTERVAL_SECS: i64 = 3_600;
const UNKNOWN_SITE: &str = "UNKNOWN";

#[derive(Debug, Error)]
pub enum ConfigFetchError {
    #[error("remote config fetch failed: {0}")]
    Fetch(String),
}

/// Trait boundary to whatever serves `configlocation` (spec §6.4).
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ConfigFetchError>;
}

/// Holds the last known good [`Config`] plus the staleness bookkeeping
/// needed to decide whether to attempt a remote refresh.
pub struct ConfigRefresher<F> {
    fetcher: F,
    current: Config,
    last_fetch: i64,
}

impl<F: ConfigFetcher> ConfigRefresher<F> {
    pub fn new(fetcher: F, initial: Config, now: i64) -> Self {
        Self { fetcher, current: initial, last_fetch: now }
    }

    pub fn current(&self) -> &Config {
        &self.current
    }

    fn interval_secs(any_unknown: bool) -> i64 {
        if any_unknown {
            DEGRADED_REFRESH_INTERVAL_SECS
        } else {
            REFRESH_INTERVAL_SECS
        }
    }

    /// Refresh from `configlocation` if stale and configured (spec §5).
    /// A fetch or parse failure leaves `current`/`last_fetch` untouched,
    /// so the next call retries rather than waiting out a full interval.
    pub async fn refresh_if_stale<C: Clock>(&mut self, clock: &C, any_unknown: bool) {
        let Some(url) = self.current.configlocation.clone() else {
            return;
        };
        let now = clock.now_utc();
        if now - self.last_fetch < Self::interval_secs(any_unknown) {
            return;
        }
        match self.fetch_and_parse(&url).await {
            Ok(config) => {
                self.current = config;
                self.last_fetch = now;
            }
            Err(err) => {
                warn!(%err, url, "remote config refresh failed, keeping last known good config");
            }
        }
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<Config, RefreshError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(Config::from_toml_str(&body)?)
    }
}

#[derive(Debug, Error)]
enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] ConfigFetchError),
    #[error(transparent)]
    Parse(#[from] ConfigError),
}

/// Whether any endpoint in this round's pairing set resolved to the
/// literal site `"UNKNOWN"` (spec §5's degraded-refresh trigger).
pub fn any_site_unknown(endpoints: &[endtoend_engine::Endpoint]) -> bool {
    endpoints.iter().any(|e| e.site == UNKNOWN_SITE)
}

#[cfg(test)]
#[path = "config_refresh_tests.rs"]
mod tests;
