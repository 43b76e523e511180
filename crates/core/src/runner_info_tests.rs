// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn locked_request_round_trips_through_json() {
    let lr = LockedRequest {
        request_uuid: RequestUuid::new(),
        fileloc: "/work/a-b-any.json.dbdone".to_string(),
        insertdate: 12345,
    };
    let json = serde_json::to_string(&lr).unwrap();
    let back: LockedRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(lr, back);
}
