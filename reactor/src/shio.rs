//! Paired reactor ("Shio"): a Rod and a Cone pole calibrated against each other.
//!
//! Pairing threads each pole's intermediate outputs into the other. Once
//! paired, a reaction is evaluated on both poles and the results must mirror
//! each other: the Rod's Kappa is the Cone's Eta and vice versa. A reaction
//! that breaks this symmetry (or yields zero) would revert on-chain and is
//! reported as `valid == false`.

use dysnomia_types::{Constants, Fa};

use crate::error::PairingAsymmetry;
use crate::math::{Reaction, modexp64};
use crate::pole::{Bonded, Charged, Pole, Saturated, Unpaired};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedReactor<R: Charged = Saturated, C: Charged = Saturated> {
    rod: Pole<R>,
    cone: Pole<C>,
    manifold: u64,
    barn: u64,
    monopole: u64,
}

impl PairedReactor {
    /// Pair two fresh poles.
    ///
    /// The order is fixed: avail, form (crossed contours), polarize,
    /// conjugate (crossed pole values), conify the Cone, saturate the Rod,
    /// saturate the Cone.
    #[must_use]
    pub fn generate(
        rod: Pole<Unpaired>,
        cone: Pole<Unpaired>,
        xi: u64,
        seed_rod: u64,
        seed_cone: u64,
    ) -> Self {
        let (mut rod, mut cone) = (rod, cone);
        rod.avail(xi);
        cone.avail(xi);

        let (rod_contour, cone_contour) = (rod.fa().contour, cone.fa().contour);
        let rod = rod.form(cone_contour);
        let cone = cone.form(rod_contour);

        let mut rod = rod.polarize();
        let mut cone = cone.polarize();

        let (rod_pole, cone_pole) = (rod.fa().pole_value, cone.fa().pole_value);
        rod.conjugate(cone_pole);
        cone.conjugate(rod_pole);

        cone.conify(seed_cone);

        let rod = rod.saturate(seed_rod, cone.fa().foundation, cone.channel());
        let cone = cone.saturate(seed_cone, rod.fa().foundation, rod.channel());

        Self::from_poles(rod, cone)
    }

    /// Rebuild a reactor from stored pole records.
    ///
    /// Each pole's Dynamo is re-derived against the partner's recomputed
    /// Channel, matching what pairing would have produced.
    #[must_use]
    pub fn hydrate(rod: Fa, cone: Fa, constants: &Constants) -> Self {
        let mut rod = Pole::hydrate(rod, constants);
        let mut cone = Pole::hydrate(cone, constants);
        rod.restore_dynamo(cone.channel());
        cone.restore_dynamo(rod.channel());
        Self::from_poles(rod, cone)
    }
}

impl<R: Charged, C: Charged> PairedReactor<R, C> {
    /// Assemble a reactor from two charged poles and establish its Monopole.
    ///
    /// Poles keep the partner channel they were saturated with, so a reactor
    /// mixing poles from different pairings reacts against those saved
    /// calibrations rather than its new partner's live Channel.
    #[must_use]
    pub fn from_poles(rod: Pole<R>, cone: Pole<C>) -> Self {
        let monopole = modexp64(rod.fa().chin, cone.fa().chin, rod.modulus());
        Self {
            rod,
            cone,
            manifold: 0,
            barn: 0,
            monopole,
        }
    }

    #[must_use]
    pub fn into_poles(self) -> (Pole<R>, Pole<C>) {
        (self.rod, self.cone)
    }

    #[must_use]
    pub const fn rod(&self) -> &Pole<R> {
        &self.rod
    }

    #[must_use]
    pub const fn cone(&self) -> &Pole<C> {
        &self.cone
    }

    #[must_use]
    pub const fn manifold(&self) -> u64 {
        self.manifold
    }

    #[must_use]
    pub const fn barn(&self) -> u64 {
        self.barn
    }

    #[must_use]
    pub const fn monopole(&self) -> u64 {
        self.monopole
    }

    /// Run the Manifold / Ring / Barn handshake.
    ///
    /// Both rings are computed under the Rod's Element: the Rod's from its own
    /// Coordinate and the Cone's from the Cone's Coordinate. Correctly paired
    /// poles hold the same Coordinate, so the rings agree.
    pub fn magnetize(&mut self) -> Handshake {
        let element = self.rod.element();
        self.manifold = self.rod.adduct(self.cone.dynamo());
        let ring = modexp64(self.rod.fa().coordinate, self.manifold, element);
        let cone_ring = modexp64(self.cone.fa().coordinate, self.manifold, element);
        self.barn = modexp64(ring, self.manifold, element);
        self.monopole = modexp64(self.rod.fa().chin, self.cone.fa().chin, self.rod.modulus());

        let handshake = Handshake {
            manifold: self.manifold,
            ring,
            cone_ring,
            barn: self.barn,
        };
        if !handshake.is_symmetric() {
            tracing::debug!(ring, cone_ring, "Magnetize handshake is asymmetric");
        }
        handshake
    }

    /// React both poles on `pi XOR Monopole`.
    ///
    /// Each pole reacts against the partner channel it was saturated with,
    /// falling back to the partner's live Channel for hydrated poles.
    #[must_use]
    pub fn react(&self, pi: u64) -> PairedReaction {
        let input = pi ^ self.monopole;
        let rod_theta = self.rod.calibration().unwrap_or(self.cone.channel());
        let cone_theta = self.cone.calibration().unwrap_or(self.rod.channel());
        PairedReaction {
            input,
            rod: self.rod.react(input, rod_theta),
            cone: self.cone.react(input, cone_theta),
        }
    }
}

impl<C: Charged> PairedReactor<Saturated, C> {
    /// Bond the Rod.
    #[must_use]
    pub fn isomerize(self) -> PairedReactor<Bonded, C> {
        PairedReactor {
            rod: self.rod.bond(),
            cone: self.cone,
            manifold: self.manifold,
            barn: self.barn,
            monopole: self.monopole,
        }
    }
}

impl<R: Charged> PairedReactor<R, Saturated> {
    /// Bond the Cone.
    #[must_use]
    pub fn isolate(self) -> PairedReactor<R, Bonded> {
        PairedReactor {
            rod: self.rod,
            cone: self.cone.bond(),
            manifold: self.manifold,
            barn: self.barn,
            monopole: self.monopole,
        }
    }
}

/// Result of [`PairedReactor::magnetize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub manifold: u64,
    pub ring: u64,
    pub cone_ring: u64,
    pub barn: u64,
}

impl Handshake {
    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.ring == self.cone_ring
    }

    /// The agreed Ring, or the disagreement.
    pub fn verify(&self) -> Result<u64, PairingAsymmetry> {
        if self.is_symmetric() {
            Ok(self.ring)
        } else {
            Err(PairingAsymmetry {
                rod: self.ring,
                cone: self.cone_ring,
            })
        }
    }
}

/// Result of [`PairedReactor::react`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedReaction {
    /// `pi XOR Monopole`.
    pub input: u64,
    pub rod: Reaction,
    pub cone: Reaction,
}

impl PairedReaction {
    #[must_use]
    pub const fn omicron(&self) -> u64 {
        self.cone.eta
    }

    #[must_use]
    pub const fn omega(&self) -> u64 {
        self.cone.kappa
    }

    /// Rod Kappa equals Cone Eta and Rod Eta equals Cone Kappa.
    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.rod.kappa == self.cone.eta && self.rod.eta == self.cone.kappa
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_symmetric() && self.cone.eta != 0 && self.cone.kappa != 0
    }

    pub fn verify(&self) -> Result<(), PairingAsymmetry> {
        if self.is_symmetric() {
            Ok(())
        } else {
            Err(PairingAsymmetry {
                rod: self.rod.kappa,
                cone: self.cone.eta,
            })
        }
    }
}
