//! Deterministic reactor math for Dysnomia.
//!
//! Everything here is pure: modular exponentiation over the Motzkin prime,
//! the pole lifecycle, the paired reactor and the thin domain mirrors that
//! fold its outputs. Chain state enters only through `hydrate` constructors.

pub mod affection;
pub mod cho;
mod error;
pub mod lau;
pub mod math;
pub mod pole;
pub mod qing;
pub mod shio;

pub use affection::Terraform;
pub use cho::Registry;
pub use error::PairingAsymmetry;
pub use lau::{IdentityMirror, IdentityReaction};
pub use math::{Reaction, modexp, modexp64};
pub use pole::{Bonded, Charged, Phase, Pole, Polarized, Saturated, Tuned, Unpaired};
pub use qing::{Admission, BouncerBalances, Territory};
pub use shio::{Handshake, PairedReaction, PairedReactor};
