// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request-intent body builders (spec §4.2 "Phase driver (create)"):
//! one JSON intent document per submission template
//! (`guaranteedCapped`/`bestEffort`/`nettest`/`l3_request`), with the
//! pair's endpoints and VLAN substituted in. Kept separate from
//! `endtoend-orchestrator-client::templates`, which owns the SPARQL
//! manifest-query bytes, not intent construction — these bodies are
//! produced by the engine and merely submitted through that trait.

use endtoend_core::RequestType;
use serde_json::{json, Value};

/// Build the intent body for one submission attempt (spec §4.2's
/// per-template deep-copy-and-substitute step). `ipv6_prefix` is only
/// consulted for `l3_request`; callers validate its presence at config
/// load time (spec §4.1, "reject L3-request configuration entries
/// lacking `ipv6_prefix`").
pub fn build_intent(
    request_type: RequestType,
    urn_a: &str,
    urn_b: &str,
    vlan: &str,
    ipv6_prefix_a: Option<&str>,
    ipv6_prefix_b: Option<&str>,
) -> Value {
    match request_type {
        RequestType::GuaranteedCapped => json!({
            "requesttype": "guaranteedCapped",
            "vlan": vlan,
            "endpoints": [urn_a, urn_b],
            "bandwidth": { "capacity": 2000 },
        }),
        RequestType::BestEffort => json!({
            "requesttype": "bestEffort",
            "vlan": vlan,
            "endpoints": [urn_a, urn_b],
        }),
        RequestType::Nettest => json!({
            "requesttype": "nettest",
            "vlan": vlan,
            "endpoints": [urn_a, urn_b],
        }),
        RequestType::L3Request => json!({
            "requesttype": "l3_request",
            "vlan": vlan,
            "endpoints": [
                { "urn": urn_a, "ipv6_prefix": ipv6_prefix_a },
                { "urn": urn_b, "ipv6_prefix": ipv6_prefix_b },
            ],
        }),
    }
}

/// The templates attempted in order for the default (non-`nettest`/
/// `l3_request`) create phase (spec §4.2: `guaranteedCapped` first,
/// falling back to `bestEffort` only on a path-finding failure).
pub const DEFAULT_TEMPLATE_ORDER: [RequestType; 2] =
    [RequestType::GuaranteedCapped, RequestType::BestEffort];

/// Read `bandwidth.capacity` off an intent body built by
/// [`build_intent`] (spec §4.2 "Phase driver (modify, modifycreate)").
pub fn capacity_of(intent: &Value) -> Option<i64> {
    intent.get("bandwidth")?.get("capacity")?.as_i64()
}

/// Apply the modify `"division"` (halve) or `"multiply"` (double)
/// action to `bandwidth.capacity` in place (spec §4.2).
pub fn apply_bandwidth_action(intent: &mut Value, action: BandwidthAction) {
    let Some(capacity) = intent.get_mut("bandwidth").and_then(|b| b.get_mut("capacity")) else {
        return;
    };
    if let Some(current) = capacity.as_i64() {
        let next = match action {
            BandwidthAction::Division => current / 2,
            BandwidthAction::Multiply => current * 2,
        };
        *capacity = Value::from(next);
    }
}

/// The two bandwidth adjustments a modify/modifycreate phase can apply
/// (spec §4.2): the first `modifycreate` in a lifecycle divides, the
/// subsequent `modify` multiplies, netting zero change over the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandwidthAction {
    Division,
    Multiply,
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
