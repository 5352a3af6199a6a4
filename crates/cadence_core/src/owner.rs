//! Owner identity
//!
//! Any stable, hashable value can key the reuse registry. `OwnerId` is the
//! ready-made choice for hosts that have no identity of their own to offer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an object that owns cached animations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

impl OwnerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// Generator for unique owner IDs
#[derive(Debug)]
pub struct OwnerIdGenerator {
    next: u64,
}

impl OwnerIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> OwnerId {
        let id = OwnerId(self.next);
        self.next += 1;
        id
    }
}

impl Default for OwnerIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
