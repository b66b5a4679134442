use serde::{Deserialize, Serialize};

use crate::{Address, Soul};

/// Session/location record attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bao {
    pub phi: Address,
    pub xi: u64,
    pub pi: u64,
    pub ring: u64,
    pub omicron: u64,
    pub omega: u64,
}

/// A registered delegate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub soul: Soul,
    /// Token contract that owns this identity.
    pub token: Address,
    pub on: Bao,
    pub entropy: u64,
    pub username: String,
}

/// Identity ("LAU") storage as hydrated from chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LauState {
    pub address: Address,
    pub saat: [u64; 3],
    pub username: String,
    pub current_area: Address,
}

impl LauState {
    #[must_use]
    pub const fn soul(&self) -> Soul {
        Soul::new(self.saat[1])
    }

    #[must_use]
    pub const fn aura(&self) -> u64 {
        self.saat[2]
    }
}
