// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ping orchestrator (spec §4.5): for a freshly-active instance, submit
//! a bounded-duration rapid-ping job on each host endpoint targeted at
//! every *other* IP in the manifest, dedup against already-pending
//! debug actions, monitor to completion, and parse `stdout`.

use endtoend_core::{Clock, PingConfig, RttStats};
use endtoend_orchestrator_client::Manifest;
use endtoend_probe_client::{DebugState, PingRequest, ProbeClient, ProbeError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const SUBMIT_RETRIES: u32 = 3;
const SUBMIT_RETRY_SLEEP_SECS: u64 = 10;
const MONITOR_POLL_SECS: u64 = 1;
const MONITOR_TIMEOUT_SECS: i64 = 600;

const IPV4_PLACEHOLDERS: [&str; 2] = ["?ipv4?", "?port_ipv4?"];
const IPV6_PLACEHOLDERS: [&str; 2] = ["?ipv6?", "?port_ipv6?"];

/// One parsed ping result, pre-`Phase`/`request_uuid` attribution (those
/// are filled in by the recorder once the artifact is written).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingOutcome {
    pub ipfrom: String,
    pub ipto: String,
    pub vlanfrom: String,
    pub vlanto: String,
    pub transmitted: u32,
    pub received: u32,
    pub packetloss: f64,
    pub rtt: Option<RttStats>,
    pub failed: bool,
}

#[derive(Debug, Clone)]
struct HostEndpoint {
    sitename: String,
    hostname: String,
    ip: String,
    interface: String,
}

fn is_placeholder(value: &str, placeholders: &[&str]) -> bool {
    placeholders.contains(&value)
}

/// `ManifestHost.hostname` is expected in `sitename:hostname` form (spec
/// §4.5, `host.Name`); hosts without a site prefix fall back to the
/// pair's own site.
fn split_site_host(hostname: &str, fallback_site: &str) -> (String, String) {
    match hostname.split_once(':') {
        Some((site, host)) => (site.to_string(), host.to_string()),
        None => (fallback_site.to_string(), hostname.to_string()),
    }
}

fn strip_prefix_len(ip: &str) -> String {
    ip.split('/').next().unwrap_or(ip).to_string()
}

/// Walk the manifest's ports (spec §4.5): build the ping-submission
/// fan-out set (one entry per non-placeholder host address, tagged with
/// `vlan.<N>` when the port carries a VLAN) and the flat "other IPs to
/// ping" set (port-level, non-placeholder addresses).
fn collect_hosts(manifest: &Manifest, fallback_site: &str) -> (Vec<HostEndpoint>, Vec<String>) {
    let mut hosts = Vec::new();
    let mut all_ips = Vec::new();

    for port in &manifest.ports {
        if let Some(ipv4) = &port.ipv4 {
            if !is_placeholder(ipv4, &IPV4_PLACEHOLDERS) {
                all_ips.push(strip_prefix_len(ipv4));
            }
        }
        if let Some(ipv6) = &port.ipv6 {
            if !is_placeholder(ipv6, &IPV6_PLACEHOLDERS) {
                all_ips.push(strip_prefix_len(ipv6));
            }
        }

        let interface = port.vlan.as_ref().map(|v| format!("vlan.{v}")).unwrap_or_else(|| "eth0".to_string());
        for host in &port.hosts {
            let (sitename, hostname) = split_site_host(&host.hostname, fallback_site);
            if let Some(ipv4) = &host.ipv4 {
                if !is_placeholder(ipv4, &IPV4_PLACEHOLDERS) {
                    let ip = strip_prefix_len(ipv4);
                    all_ips.push(ip.clone());
                    hosts.push(HostEndpoint { sitename: sitename.clone(), hostname: hostname.clone(), ip, interface: interface.clone() });
                }
            }
            if let Some(ipv6) = &host.ipv6 {
                if !is_placeholder(ipv6, &IPV6_PLACEHOLDERS) {
                    let ip = strip_prefix_len(ipv6);
                    all_ips.push(ip.clone());
                    hosts.push(HostEndpoint { sitename: sitename.clone(), hostname: hostname.clone(), ip, interface: interface.clone() });
                }
            }
        }
    }
    (hosts, all_ips)
}

/// List pending/active debug actions for this host and adopt an
/// identical one; otherwise submit fresh, retrying up to
/// [`SUBMIT_RETRIES`] times with [`SUBMIT_RETRY_SLEEP_SECS`] between
/// attempts (spec §4.5).
async fn dedup_or_submit<C: ProbeClient>(client: &C, sitename: &str, request: &PingRequest) -> Result<String, ProbeError> {
    for state in [DebugState::New, DebugState::Active] {
        let existing = client.get_all_debug_hostname(sitename, &request.hostname, state).await?;
        if let Some(found) = existing.into_iter().find(|a| &a.requestdict == request) {
            return Ok(found.id);
        }
    }

    let mut last_err = None;
    for attempt in 0..SUBMIT_RETRIES {
        match client.submit_ping(request.clone()).await {
            Ok(outcome) if outcome.accepted => return Ok(outcome.id),
            Ok(outcome) => last_err = Some(ProbeError::Other(format!("rejected: {}", outcome.status))),
            Err(err) => last_err = Some(err),
        }
        if attempt + 1 < SUBMIT_RETRIES {
            tokio::time::sleep(Duration::from_secs(SUBMIT_RETRY_SLEEP_SECS)).await;
        }
    }
    Err(last_err.unwrap_or_else(|| ProbeError::Other("submission failed".to_string())))
}

fn parse_outcome(
    host: &HostEndpoint,
    ipto: &str,
    action: &endtoend_probe_client::DebugAction,
    hostips: &HashMap<String, String>,
    ipvlans: &HashMap<String, String>,
) -> PingOutcome {
    let transmitted_re = Regex::new(r"(\d+)\s+packets transmitted").expect("static regex");
    let received_re = Regex::new(r"(\d+)\s+received").expect("static regex");
    let packetloss_re = Regex::new(r"(\d+(?:\.\d+)?)% packet loss").expect("static regex");
    let rtt_re = Regex::new(r"rtt min/avg/max/mdev = ([\d.]+)/([\d.]+)/([\d.]+)/([\d.]+)").expect("static regex");

    let mut transmitted = 0u32;
    let mut received = 0u32;
    let mut packetloss = 0.0f64;
    let mut rtt = None;

    for line in &action.output {
        if let Some(c) = transmitted_re.captures(line) {
            transmitted = c[1].parse().unwrap_or(0);
        }
        if let Some(c) = received_re.captures(line) {
            received = c[1].parse().unwrap_or(0);
        }
        if let Some(c) = packetloss_re.captures(line) {
            packetloss = c[1].parse().unwrap_or(0.0);
        }
        if let Some(c) = rtt_re.captures(line) {
            rtt = Some(RttStats {
                min: c[1].parse().unwrap_or(0.0),
                avg: c[2].parse().unwrap_or(0.0),
                max: c[3].parse().unwrap_or(0.0),
                mdev: c[4].parse().unwrap_or(0.0),
            });
        }
    }

    let ipfrom = hostips.get(&host.hostname).cloned().unwrap_or_else(|| "unknown".to_string());
    let vlanfrom = ipvlans.get(&ipfrom).cloned().unwrap_or_else(|| "any".to_string());
    let vlanto = ipvlans.get(ipto).cloned().unwrap_or_else(|| "any".to_string());
    let failed = transmitted == 0 || received == 0 || packetloss > 0.0;

    PingOutcome {
        ipfrom,
        ipto: ipto.to_string(),
        vlanfrom,
        vlanto,
        transmitted,
        received,
        packetloss,
        rtt,
        failed,
    }
}

/// Submit, monitor, and parse every ping in the fan-out set (spec
/// §4.5). Returns the parsed outcomes plus any submission-error
/// messages (submissions that exhausted all retries are skipped, not
/// retried forever).
pub async fn run_pings<C: ProbeClient, Clk: Clock>(
    client: &C,
    clock: &Clk,
    config: &PingConfig,
    manifest: &Manifest,
    fallback_site: &str,
) -> (Vec<PingOutcome>, Vec<String>) {
    let (hosts, all_ips) = collect_hosts(manifest, fallback_site);

    let mut hostips: HashMap<String, String> = HashMap::new();
    let mut ipvlans: HashMap<String, String> = HashMap::new();
    for host in &hosts {
        hostips.entry(host.hostname.clone()).or_insert_with(|| host.ip.clone());
        ipvlans.entry(host.ip.clone()).or_insert_with(|| host.interface.clone());
    }

    let mut pending = Vec::new();
    let mut submit_errors = Vec::new();
    for host in &hosts {
        for other_ip in &all_ips {
            if *other_ip == host.ip {
                continue;
            }
            let request = PingRequest::new(
                host.hostname.clone(),
                host.sitename.clone(),
                other_ip.clone(),
                host.interface.clone(),
                config.packetsize,
                config.interval,
                config.duration,
            );
            match dedup_or_submit(client, &host.sitename, &request).await {
                Ok(id) => pending.push((host.clone(), other_ip.clone(), id)),
                Err(err) => submit_errors.push(format!("{}->{}: {err}", host.hostname, other_ip)),
            }
        }
    }

    let mut outcomes = Vec::new();
    let deadline = clock.now_utc() + MONITOR_TIMEOUT_SECS;
    while !pending.is_empty() && clock.now_utc() < deadline {
        let mut still_pending = Vec::new();
        for (host, ip, id) in pending {
            match client.get_debug(&host.sitename, &id).await {
                Ok(action) if action.state != DebugState::New.as_str() && action.state != DebugState::Active.as_str() => {
                    outcomes.push(parse_outcome(&host, &ip, &action, &hostips, &ipvlans));
                }
                _ => still_pending.push((host, ip, id)),
            }
        }
        pending = still_pending;
        if !pending.is_empty() {
            tokio::time::sleep(Duration::from_secs(MONITOR_POLL_SECS)).await;
        }
    }

    for (host, ip, id) in pending {
        if let Ok(action) = client.get_debug(&host.sitename, &id).await {
            outcomes.push(parse_outcome(&host, &ip, &action, &hostips, &ipvlans));
        }
    }

    (outcomes, submit_errors)
}

#[cfg(test)]
#[path = "ping_tests.rs"]
mod tests;
