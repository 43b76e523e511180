// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn stem_is_order_independent() {
    let p1 = Pair::new("urn:a", "urn:b", "any");
    let p2 = Pair::new("urn:b", "urn:a", "any");
    assert_eq!(p1.stem(), p2.stem());
}

#[test]
fn stem_includes_vlan() {
    let pair = Pair::new("urn:a", "urn:b", "100");
    assert!(pair.stem().ends_with("-100"));
}
