//! Core domain types for the Dysnomia preview engine.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the workspace: the reactor math,
//! the chain loader and the preview dispatcher all speak these types.

mod fa;
mod ids;
mod identity;
mod preview;

pub use fa::{AffectionState, Fa};
pub use ids::Soul;
pub use identity::{Bao, LauState, User};
pub use preview::{OutputValue, PreviewResult, Step};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Protocol Constants
// ============================================================================

/// The Motzkin prime: global modulus for every reactor derivation.
pub const MOTZKIN_PRIME: u64 = 953_467_954_114_363;

/// Divisor used for the territory GWAT flag.
pub const GWAT_DIVISOR: u64 = 476_733_977_057_179;

/// Little-endian u32 limbs of the Gua coordinate constant
/// (1652929763764148448182513644633101239607891671119935657884642).
const GUA_LIMBS: [u32; 7] = [
    0x23fe_3be2,
    0x7d19_2cca,
    0x5e75_f160,
    0xf768_cb8b,
    0x8f7c_41a7,
    0x53af_f4d9,
    0x0000_0107,
];

/// Process-wide protocol constants.
///
/// Constructed once at startup and passed by reference to every component
/// that derives values. Nothing in the workspace reads these from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constants {
    modulus: u64,
    uint64_max: u64,
    gwat_divisor: u64,
    gua: BigUint,
}

impl Constants {
    /// The constants of the deployed protocol.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            modulus: MOTZKIN_PRIME,
            uint64_max: u64::MAX,
            gwat_divisor: GWAT_DIVISOR,
            gua: BigUint::from_slice(&GUA_LIMBS),
        }
    }

    #[must_use]
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Clamp ceiling of the 64-bit result domain.
    #[must_use]
    pub const fn uint64_max(&self) -> u64 {
        self.uint64_max
    }

    #[must_use]
    pub const fn gwat_divisor(&self) -> u64 {
        self.gwat_divisor
    }

    #[must_use]
    pub fn gua(&self) -> &BigUint {
        &self.gua
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::canonical()
    }
}

// ============================================================================
// Address
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("address must start with 0x (got {0})")]
    MissingPrefix(String),
    #[error("address must be 40 hex digits (got {0} digits)")]
    Length(usize),
    #[error("address contains a non-hex character: {0}")]
    NonHex(String),
}

/// A 20-byte account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0; 20]);

    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The address as a `uint160`.
    #[must_use]
    pub fn to_uint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::MissingPrefix(trimmed.to_string()))?;
        if digits.len() != 40 {
            return Err(AddressParseError::Length(digits.len()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressParseError::NonHex(trimmed.to_string()));
        }

        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| AddressParseError::NonHex(trimmed.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
