//! Stored reactor records.
//!
//! [`Fa`] is the plain 13-field pole record exactly as the contracts store it.
//! Derivation rules live in the reactor crate; this is only the data.

use serde::{Deserialize, Serialize};

/// Single pole of the coordinate system.
///
/// Field order matches storage order: four fields per 32-byte slot,
/// least-significant lane first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fa {
    pub base: u64,
    pub secret: u64,
    pub signal: u64,
    pub channel: u64,
    pub contour: u64,
    #[serde(rename = "pole")]
    pub pole_value: u64,
    pub identity: u64,
    pub foundation: u64,
    pub element: u64,
    pub coordinate: u64,
    pub charge: u64,
    pub chin: u64,
    pub monopole: u64,
}

impl Fa {
    pub const FIELD_COUNT: usize = 13;

    /// Build a record from its fields in storage order.
    #[must_use]
    pub const fn from_fields(f: [u64; Self::FIELD_COUNT]) -> Self {
        Self {
            base: f[0],
            secret: f[1],
            signal: f[2],
            channel: f[3],
            contour: f[4],
            pole_value: f[5],
            identity: f[6],
            foundation: f[7],
            element: f[8],
            coordinate: f[9],
            charge: f[10],
            chin: f[11],
            monopole: f[12],
        }
    }

    /// Fields in storage order.
    #[must_use]
    pub const fn fields(&self) -> [u64; Self::FIELD_COUNT] {
        [
            self.base,
            self.secret,
            self.signal,
            self.channel,
            self.contour,
            self.pole_value,
            self.identity,
            self.foundation,
            self.element,
            self.coordinate,
            self.charge,
            self.chin,
            self.monopole,
        ]
    }
}

/// Terraform ("Faung") storage as hydrated from the Affection contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AffectionState {
    pub rod: Fa,
    pub cone: Fa,
    pub phi: u64,
    pub eta: u64,
    pub xi: u64,
    pub sigma: u64,
    pub rho: u64,
    pub upsilon: u64,
    pub ohm: u64,
    pub pi: u64,
    pub omicron: u64,
    pub omega: u64,
    pub chi: u64,
    /// Kappa of the Rod's most recent reaction.
    pub rod_kappa: u64,
}
