//! Territory mirror ("QING").
//!
//! GWAT is fixed at construction from the territory's Waat. Admission and
//! bouncer checks mirror the contract's predicates over caller-supplied
//! balances and timestamps.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroU16;

use dysnomia_types::{Address, Constants};
use num_bigint::BigUint;
use num_traits::Zero;

/// Seconds a guest-list entry stays valid after `join`.
pub const GUEST_LIST_WINDOW_SECS: u64 = 86_400;

/// CROWS holdings (18 decimals) that grant bouncer rights: 25 tokens.
#[must_use]
pub fn crows_threshold() -> BigUint {
    BigUint::from(25u32) * BigUint::from(10u32).pow(18)
}

pub const DEFAULT_BOUNCER_DIVISOR: NonZeroU16 = match NonZeroU16::new(32) {
    Some(d) => d,
    None => unreachable!(),
};

/// `Waat mod GwatDivisor != 0`.
#[must_use]
pub fn is_gwat(waat: &BigUint, constants: &Constants) -> bool {
    !(waat % constants.gwat_divisor()).is_zero()
}

/// Balances needed to decide bouncer rights for one address.
#[derive(Debug, Clone, Default)]
pub struct BouncerBalances {
    pub asset: BigUint,
    pub total_supply: BigUint,
    pub crows: BigUint,
}

/// Result of [`Territory::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub expires_at: u64,
    /// Whether this join wrote a fresh guest-list entry.
    pub extended: bool,
}

#[derive(Debug, Clone)]
pub struct Territory {
    waat: BigUint,
    entropy: u64,
    gwat: bool,
    pub bouncer_divisor: NonZeroU16,
    pub cover_charge: BigUint,
    pub no_crows: bool,
    pub staff: HashSet<Address>,
    guest_list: HashMap<Address, u64>,
}

impl Territory {
    #[must_use]
    pub fn new(waat: BigUint, entropy: u64, constants: &Constants) -> Self {
        let gwat = is_gwat(&waat, constants);
        Self {
            waat,
            entropy,
            gwat,
            bouncer_divisor: DEFAULT_BOUNCER_DIVISOR,
            cover_charge: BigUint::zero(),
            no_crows: false,
            staff: HashSet::new(),
            guest_list: HashMap::new(),
        }
    }

    #[must_use]
    pub fn waat(&self) -> &BigUint {
        &self.waat
    }

    #[must_use]
    pub const fn entropy(&self) -> u64 {
        self.entropy
    }

    #[must_use]
    pub const fn is_gwat(&self) -> bool {
        self.gwat
    }

    #[must_use]
    pub fn guest_list_entry(&self, token: &Address) -> u64 {
        self.guest_list.get(token).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has_guest_list_entry(&self, token: &Address) -> bool {
        self.guest_list.contains_key(token)
    }

    #[must_use]
    pub fn charges_cover(&self) -> bool {
        !self.cover_charge.is_zero()
    }

    /// Seed a guest-list expiry, e.g. from chain state.
    pub fn set_guest_list_entry(&mut self, token: Address, expires_at: u64) {
        self.guest_list.insert(token, expires_at);
    }

    /// Always admitted when there is no cover charge; otherwise only while the
    /// guest-list entry is strictly later than `as_of`.
    #[must_use]
    pub fn is_admitted(&self, token: &Address, as_of: u64) -> bool {
        self.cover_charge.is_zero() || self.guest_list_entry(token) > as_of
    }

    #[must_use]
    pub fn is_bouncer(&self, address: &Address, balances: &BouncerBalances) -> bool {
        if self.staff.contains(address) {
            return true;
        }
        if !self.no_crows && balances.crows >= crows_threshold() {
            return true;
        }
        balances.asset >= &balances.total_supply / u32::from(self.bouncer_divisor.get())
    }

    /// Renew the guest-list entry when it has lapsed before `now`.
    pub fn join(&mut self, token: Address, now: u64) -> Admission {
        let current = self.guest_list_entry(&token);
        if current < now {
            let expires_at = now.saturating_add(GUEST_LIST_WINDOW_SECS);
            self.guest_list.insert(token, expires_at);
            tracing::debug!(%token, expires_at, "Guest list entry renewed");
            return Admission {
                expires_at,
                extended: true,
            };
        }
        Admission {
            expires_at: current,
            extended: false,
        }
    }
}
