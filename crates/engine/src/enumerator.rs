// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pair enumerator (spec §4.1): produces the work queue for one round
//! from either a static `entries` table or a dynamic `entriesdynamic`
//! domain query against the Orchestrator's manifest endpoint, then
//! shuffles, truncates to `maxpairs`, and expands across the configured
//! VLAN range.

use crate::error::EngineError;
use endtoend_core::{expand_vlans, Config, Pair};
use endtoend_orchestrator_client::{templates, OrchestratorClient};
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// One statically- or dynamically-discovered endpoint, before pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub urn: String,
    pub site: String,
    pub ipv6_prefix: Option<String>,
}

/// One surviving `(urn_a, urn_b, vlan)` triple, carrying the site names
/// needed to populate `Request.site1`/`site2` downstream (spec §4.1's
/// output shape, §3 Data Model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCandidate {
    pub pair: Pair,
    pub site1: String,
    pub site2: String,
}

/// Step 1/2: the statically-configured endpoint list, minus disabled
/// entries, filtered by `filter.include`/`filter.exclude` (spec §4.1).
pub fn static_entries(config: &Config) -> Vec<Endpoint> {
    let entries = match &config.entries {
        Some(entries) => entries,
        None => return Vec::new(),
    };
    entries
        .iter()
        .filter(|(_, entry)| !entry.disabled)
        .map(|(urn, entry)| Endpoint {
            urn: urn.clone(),
            site: entry.site.clone(),
            ipv6_prefix: entry.ipv6_prefix.clone(),
        })
        .filter(|endpoint| passes_filter(config, &endpoint.urn))
        .collect()
}

/// Grouped-hosts path (spec §4.1): fetch per-domain ports from the
/// Orchestrator's manifest query, one row per bidirectional port, and
/// filter identically to the static-entry path. Converges on the same
/// [`Endpoint`] shape before pairing runs.
pub async fn dynamic_entries<C: OrchestratorClient>(
    config: &Config,
    client: &C,
) -> Result<Vec<Endpoint>, EngineError> {
    let domain_site = config.entriessitename.clone().unwrap_or_default();
    let manifest = client.manifest_create(templates::ports_per_domain_template()).await?;
    let endpoints = manifest
        .ports
        .into_iter()
        .map(|port| Endpoint { urn: port.port_name, site: domain_site.clone(), ipv6_prefix: None })
        .filter(|endpoint| passes_filter(config, &endpoint.urn))
        .collect();
    Ok(endpoints)
}

fn passes_filter(config: &Config, urn: &str) -> bool {
    if !config.filter.include.is_empty() && !config.filter.include.contains(urn) {
        return false;
    }
    !config.filter.exclude.contains(urn)
}

/// Steps 3–5, shared by both the static and grouped-hosts paths: pair
/// construction, uniform shuffle + truncation, and VLAN expansion.
pub fn build_pairs(endpoints: &[Endpoint], config: &Config) -> Result<Vec<PairCandidate>, EngineError> {
    let mut pairs = raw_pairs(endpoints, config);

    let mut rng = rand::thread_rng();
    pairs.shuffle(&mut rng);
    pairs.truncate(config.maxpairs);

    let vlans = expand_vlans(config.vlans.as_deref())?;
    let mut out = Vec::with_capacity(pairs.len() * vlans.len());
    for (a, b) in &pairs {
        for vlan in &vlans {
            out.push(PairCandidate {
                pair: Pair::new(a.urn.clone(), b.urn.clone(), vlan.to_string()),
                site1: a.site.clone(),
                site2: b.site.clone(),
            });
        }
    }
    Ok(out)
}

fn raw_pairs(endpoints: &[Endpoint], config: &Config) -> Vec<(Endpoint, Endpoint)> {
    match &config.vlansto {
        Some(anchors) => {
            let anchor_set: HashSet<&str> = anchors.iter().map(String::as_str).collect();
            let anchors: Vec<&Endpoint> =
                endpoints.iter().filter(|e| anchor_set.contains(e.urn.as_str())).collect();
            let mut out = Vec::new();
            for anchor in &anchors {
                for endpoint in endpoints {
                    if endpoint.urn != anchor.urn {
                        out.push(((*anchor).clone(), endpoint.clone()));
                    }
                }
            }
            out
        }
        None => {
            let mut out = Vec::new();
            for i in 0..endpoints.len() {
                for j in (i + 1)..endpoints.len() {
                    out.push((endpoints[i].clone(), endpoints[j].clone()));
                }
            }
            out
        }
    }
}

#[cfg(test)]
#[path = "enumerator_tests.rs"]
mod tests;
