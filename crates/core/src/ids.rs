// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newtype identifiers for the core entities.
//!
//! `uuid` is the sole cross-table join key (spec Data Model invariants);
//! every row-level identifier in this crate wraps a `uuid::Uuid` rather
//! than a bare `String` so the compiler, not a convention, prevents
//! mixing a `RequestUuid` up with an `ActionUuid`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }
    };
}

define_uuid_id! {
    /// Identifies one full lifecycle run against the Orchestrator (`Request` row).
    pub struct RequestUuid;
}

define_uuid_id! {
    /// Identifies one phase boundary within a `Request` (`Action` row).
    pub struct ActionUuid;
}

define_uuid_id! {
    /// Identifies one verification outcome row.
    pub struct VerificationUuid;
}

define_uuid_id! {
    /// Identifies one ping-probe outcome row.
    pub struct PingResultUuid;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
