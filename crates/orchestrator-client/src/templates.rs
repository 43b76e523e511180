// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SPARQL manifest-query templates (spec §4.2/§6.1/§9 "SPARQL template as
//! opaque bytes"). These are interpreted by the Orchestrator and must not
//! be reformatted; they are kept as embedded string constants at the
//! boundary, exactly as the source expresses them.

/// Port/host discovery: addresses on the vlan port and the non-VLAN
/// bidirectional port it is aliased from.
pub const MANIFEST_SPARQL_PORT_HOST: &str = r#"SELECT DISTINCT ?host_port ?ipv4 ?ipv6 ?mac WHERE { ?host_vlan_port nml:isAlias ?vlan_port. ?host_port nml:hasBidirectionalPort ?host_vlan_port. OPTIONAL {?host_vlan_port mrs:hasNetworkAddress  ?ipv4na. ?ipv4na mrs:type "ipv4-address". ?ipv4na mrs:value ?ipv4.} OPTIONAL {?host_vlan_port mrs:hasNetworkAddress  ?ipv6na. ?ipv6na mrs:type "ipv6-address". ?ipv6na mrs:value ?ipv6.} OPTIONAL {?host_vlan_port mrs:hasNetworkAddress  ?macana. ?macana mrs:type "mac-address". ?macana mrs:value ?mac.} FILTER NOT EXISTS {?sw_svc mrs:providesSubnet ?vlan_subnt. ?vlan_subnt nml:hasBidirectionalPort ?host_vlan_port.} }"#;

/// Host-name / `sense-rtmon:name` extension for the port/host query above.
pub const MANIFEST_SPARQL_PORT_HOST_EXT: &str = r#"SELECT DISTINCT ?host_name ?host_port_name  WHERE {?host a nml:Node. ?host nml:hasBidirectionalPort ?host_port. OPTIONAL {?host nml:name ?host_name.} OPTIONAL {?host_port mrs:hasNetworkAddress ?na_pn. ?na_pn mrs:type "sense-rtmon:name". ?na_pn mrs:value ?host_port_name.} }"#;

/// Ports-per-domain discovery: vlan port and assigned vlan label.
pub const MANIFEST_SPARQL_PORTS_PER_DOMAIN: &str = "SELECT DISTINCT  ?vlan_port  ?vlan  WHERE { ?subnet a mrs:SwitchingSubnet. ?subnet nml:hasBidirectionalPort ?vlan_port. ?vlan_port nml:hasLabel ?vlan_l. ?vlan_l nml:value ?vlan. }";

/// Ports-per-domain extension: node/site/peer/address detail for each
/// terminal, unioned across `Node` and `Topology` subjects.
pub const MANIFEST_SPARQL_PORTS_PER_DOMAIN_EXT: &str = r#"SELECT DISTINCT ?terminal ?port_name ?node_name ?peer ?site ?port_mac ?port_ipv4 ?port_ipv6 WHERE { { ?node a nml:Node. ?node nml:name ?node_name. ?node nml:hasBidirectionalPort ?terminal. ?terminal nml:hasBidirectionalPort ?vlan_port. OPTIONAL { ?terminal mrs:hasNetworkAddress ?na_pn. ?na_pn mrs:type "sense-rtmon:name". ?na_pn mrs:value ?port_name. } OPTIONAL { ?terminal nml:isAlias ?peer. } OPTIONAL { ?site nml:hasNode ?node. } OPTIONAL { ?site nml:hasTopology ?sub_site. ?sub_site nml:hasNode ?node. } OPTIONAL { ?terminal mrs:hasNetworkAddress ?naportmac. ?naportmac mrs:type "mac-address". ?naportmac mrs:value ?port_mac. } OPTIONAL { ?vlan_port mrs:hasNetworkAddress ?ipv4na. ?ipv4na mrs:type "ipv4-address". ?ipv4na mrs:value ?port_ipv4. } OPTIONAL { ?vlan_port mrs:hasNetworkAddress ?ipv6na. ?ipv6na mrs:type "ipv6-address". ?ipv6na mrs:value ?port_ipv6. } } UNION { ?site a nml:Topology. ?site nml:name ?node_name. ?site nml:hasBidirectionalPort ?terminal. ?terminal nml:hasBidirectionalPort ?vlan_port. OPTIONAL { ?terminal mrs:hasNetworkAddress ?na_pn. ?na_pn mrs:type "sense-rtmon:name". ?na_pn mrs:value ?port_name. } OPTIONAL { ?terminal nml:isAlias ?peer. } OPTIONAL { ?terminal mrs:hasNetworkAddress ?naportmac. ?naportmac mrs:type "mac-address". ?naportmac mrs:value ?port_mac. } OPTIONAL { ?vlan_port mrs:hasNetworkAddress ?ipv4na. ?ipv4na mrs:type "ipv4-address". ?ipv4na mrs:value ?port_ipv4. } OPTIONAL { ?vlan_port mrs:hasNetworkAddress ?ipv6na. ?ipv6na mrs:type "ipv6-address". ?ipv6na mrs:value ?port_ipv6. } } }"#;

/// Single-port lookup used by the dynamic endpoint enumerator (spec
/// §4.1, grouped-hosts path): `REPLACEME` is substituted with the
/// domain/port URI by the caller before submission.
pub const PORTS_FOR_URN_SPARQL: &str =
    "SELECT ?port   WHERE { <REPLACEME> nml:hasBidirectionalPort ?port.  }";

/// Build the `manifest_create` request body for the port/host query
/// (spec §6.1): a JSON object with `sparql`/`sparql-ext` keys, passed to
/// `OrchestratorClient::manifest_create` verbatim.
pub fn port_host_template() -> serde_json::Value {
    serde_json::json!({
        "sparql": MANIFEST_SPARQL_PORT_HOST,
        "sparql-ext": MANIFEST_SPARQL_PORT_HOST_EXT,
    })
}

/// Build the `manifest_create` request body for the ports-per-domain
/// query (spec §4.1 grouped-hosts path).
pub fn ports_per_domain_template() -> serde_json::Value {
    serde_json::json!({
        "sparql": MANIFEST_SPARQL_PORTS_PER_DOMAIN,
        "sparql-ext": MANIFEST_SPARQL_PORTS_PER_DOMAIN_EXT,
    })
}
