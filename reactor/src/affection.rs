//! Terraform orchestrator ("Affection").
//!
//! Accumulates reactor outputs into four scalars with XOR folds. The modular
//! work all happens in the paired reactor; this layer only records and
//! combines its results.

use dysnomia_types::{AffectionState, Constants};

use crate::shio::{PairedReaction, PairedReactor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terraform {
    reactor: PairedReactor,
    upsilon: u64,
    ohm: u64,
    pi: u64,
    omega: u64,
    rod_kappa: u64,
}

impl Terraform {
    /// A terraform over a freshly paired reactor with zeroed accumulators.
    #[must_use]
    pub fn new(reactor: PairedReactor) -> Self {
        Self {
            reactor,
            upsilon: 0,
            ohm: 0,
            pi: 0,
            omega: 0,
            rod_kappa: 0,
        }
    }

    #[must_use]
    pub fn hydrate(state: &AffectionState, constants: &Constants) -> Self {
        Self {
            reactor: PairedReactor::hydrate(state.rod, state.cone, constants),
            upsilon: state.upsilon,
            ohm: state.ohm,
            pi: state.pi,
            omega: state.omega,
            rod_kappa: state.rod_kappa,
        }
    }

    #[must_use]
    pub const fn reactor(&self) -> &PairedReactor {
        &self.reactor
    }

    #[must_use]
    pub const fn upsilon_value(&self) -> u64 {
        self.upsilon
    }

    #[must_use]
    pub const fn ohm(&self) -> u64 {
        self.ohm
    }

    #[must_use]
    pub const fn pi(&self) -> u64 {
        self.pi
    }

    #[must_use]
    pub const fn omega(&self) -> u64 {
        self.omega
    }

    /// Kappa cached from the most recent Rod reaction.
    #[must_use]
    pub const fn rod_kappa(&self) -> u64 {
        self.rod_kappa
    }

    /// Upsilon = a ^ Ohm (^ Pi when `use_pi`).
    pub fn upsilon(&mut self, a: u64, use_pi: bool) -> u64 {
        self.upsilon = if use_pi {
            a ^ self.ohm ^ self.pi
        } else {
            a ^ self.ohm
        };
        self.upsilon
    }

    /// Omega ^= cached Rod Kappa.
    pub fn rho(&mut self) -> u64 {
        self.omega ^= self.rod_kappa;
        self.omega
    }

    /// Omega ^= Rod Kappa; Upsilon ^= Ohm ^ Pi. Returns the new Upsilon.
    pub fn generate(&mut self) -> u64 {
        self.omega ^= self.rod_kappa;
        self.upsilon ^= self.ohm ^ self.pi;
        self.upsilon
    }

    /// Run a paired reaction and cache its Rod Kappa for later folds.
    pub fn react(&mut self, pi: u64) -> PairedReaction {
        let reaction = self.reactor.react(pi);
        self.rod_kappa = reaction.rod.kappa;
        reaction
    }
}
