//! Single-pole reactor state ("Fa") as a phase-checked state machine.
//!
//! A pole only becomes meaningful after an ordered sequence of derivations.
//! The phase is carried in the type, so each derivation is only callable from
//! the phase that precedes it:
//!
//! ```text
//! Pole<Unpaired> --form--> Pole<Tuned> --polarize--> Pole<Polarized>
//!     --saturate--> Pole<Saturated> --bond--> Pole<Bonded>
//! ```
//!
//! `Saturated` and `Bonded` poles are [`Charged`]: they have an `Element` and
//! can be used as a per-pole modulus for `adduct`.

use std::fmt;
use std::marker::PhantomData;

use dysnomia_types::{Constants, Fa};

use crate::math::{self, Reaction, modexp64};

mod sealed {
    pub trait Sealed {}
}

/// Marker trait for pole phases.
pub trait Phase: sealed::Sealed + fmt::Debug + Clone + Copy + PartialEq + Eq {}

/// Phases in which the pole carries a usable `Element`.
pub trait Charged: Phase {}

/// Base, Secret and Signal set; Channel tuned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpaired;

/// Base re-formed from a partner's contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuned;

/// Pole value derived; coordinate and identity can be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polarized;

/// Charge, Chin, Element and Monopole derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturated;

/// Dynamo re-derived against the pole's own Element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bonded;

impl sealed::Sealed for Unpaired {}
impl sealed::Sealed for Tuned {}
impl sealed::Sealed for Polarized {}
impl sealed::Sealed for Saturated {}
impl sealed::Sealed for Bonded {}

impl Phase for Unpaired {}
impl Phase for Tuned {}
impl Phase for Polarized {}
impl Phase for Saturated {}
impl Phase for Bonded {}

impl Charged for Saturated {}
impl Charged for Bonded {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pole<P: Phase> {
    fa: Fa,
    dynamo: u64,
    /// Partner channel this pole was saturated against.
    calibration: Option<u64>,
    modulus: u64,
    phase: PhantomData<P>,
}

impl<P: Phase> Pole<P> {
    #[must_use]
    pub const fn fa(&self) -> &Fa {
        &self.fa
    }

    #[must_use]
    pub const fn channel(&self) -> u64 {
        self.fa.channel
    }

    #[must_use]
    pub const fn dynamo(&self) -> u64 {
        self.dynamo
    }

    #[must_use]
    pub const fn calibration(&self) -> Option<u64> {
        self.calibration
    }

    #[must_use]
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Channel = Base^Signal mod M.
    pub fn tune(&mut self) {
        self.fa.channel = self.exp(self.fa.base, self.fa.signal);
    }

    /// Evaluate React against `theta` without touching the pole.
    #[must_use]
    pub fn react(&self, pi: u64, theta: u64) -> Reaction {
        math::react(pi, self.fa.channel, theta)
    }

    fn exp(&self, base: u64, exponent: u64) -> u64 {
        modexp64(base, exponent, self.modulus)
    }

    fn advance<Q: Phase>(self) -> Pole<Q> {
        Pole {
            fa: self.fa,
            dynamo: self.dynamo,
            calibration: self.calibration,
            modulus: self.modulus,
            phase: PhantomData,
        }
    }
}

impl Pole<Unpaired> {
    /// A fresh pole. Every derived field is zero except the tuned Channel.
    #[must_use]
    pub fn new(base: u64, secret: u64, signal: u64, constants: &Constants) -> Self {
        let mut pole = Self {
            fa: Fa {
                base,
                secret,
                signal,
                ..Fa::default()
            },
            dynamo: 0,
            calibration: None,
            modulus: constants.modulus(),
            phase: PhantomData,
        };
        pole.tune();
        pole
    }

    /// Contour = x^Secret mod M.
    pub fn avail(&mut self, x: u64) {
        self.fa.contour = self.exp(x, self.fa.secret);
    }

    /// Base = x^Secret mod M, then re-tune.
    #[must_use]
    pub fn form(mut self, x: u64) -> Pole<Tuned> {
        self.fa.base = self.exp(x, self.fa.secret);
        self.tune();
        self.advance()
    }
}

impl Pole<Tuned> {
    /// PoleValue = Base^Secret mod M.
    #[must_use]
    pub fn polarize(mut self) -> Pole<Polarized> {
        self.fa.pole_value = self.exp(self.fa.base, self.fa.secret);
        self.advance()
    }
}

impl Pole<Polarized> {
    /// Coordinate = x^Secret mod M.
    pub fn conjugate(&mut self, x: u64) {
        self.fa.coordinate = self.exp(x, self.fa.secret);
    }

    /// Identity = seed; Foundation = Base^Identity mod M.
    pub fn conify(&mut self, seed: u64) {
        self.fa.identity = seed;
        self.fa.foundation = self.exp(self.fa.base, self.fa.identity);
    }

    /// Derive Charge, Chin, Element, Dynamo and Monopole.
    ///
    /// `seed` is only used when no identity has been set yet. `theta` is the
    /// partner channel and is remembered as this pole's calibration.
    #[must_use]
    pub fn saturate(mut self, seed: u64, epsilon: u64, theta: u64) -> Pole<Saturated> {
        if self.fa.identity == 0 {
            self.conify(seed);
        }

        let identity = self.fa.identity;
        let signal = self.fa.signal;
        let local_a = self.exp(epsilon, identity);
        let local_b = self.exp(theta, identity);
        let local_c = self.exp(epsilon, signal);

        self.fa.charge = local_b.wrapping_add(local_c);
        self.fa.chin = local_a.wrapping_add(local_c);
        self.fa.element = local_a.wrapping_add(self.fa.charge);

        self.dynamo = self.exp(theta, signal);
        self.fa.monopole = self.exp(self.fa.chin, identity);
        self.calibration = Some(theta);
        self.advance()
    }
}

impl Pole<Saturated> {
    /// Rebuild a pole from stored state.
    ///
    /// Channel is recomputed from Base and Signal rather than trusted. The
    /// companion Dynamo and the calibration are not stored on-chain and start
    /// unset; a paired hydration restores the Dynamo from the partner.
    #[must_use]
    pub fn hydrate(fa: Fa, constants: &Constants) -> Self {
        let mut pole = Self {
            fa,
            dynamo: 0,
            calibration: None,
            modulus: constants.modulus(),
            phase: PhantomData,
        };
        pole.tune();
        if pole.fa.channel != fa.channel {
            tracing::debug!(
                stored = fa.channel,
                derived = pole.fa.channel,
                "Stored channel is stale; using derived value"
            );
        }
        pole
    }

    /// Dynamo = partner_channel^Signal mod M, as saturation derived it.
    pub(crate) fn restore_dynamo(&mut self, partner_channel: u64) {
        self.dynamo = self.exp(partner_channel, self.fa.signal);
    }

    /// Dynamo = Base^Signal mod Element; PoleValue cleared.
    #[must_use]
    pub fn bond(mut self) -> Pole<Bonded> {
        self.dynamo = modexp64(self.fa.base, self.fa.signal, self.fa.element);
        self.fa.pole_value = 0;
        self.advance()
    }
}

impl<P: Charged> Pole<P> {
    #[must_use]
    pub const fn element(&self) -> u64 {
        self.fa.element
    }

    /// x^Signal mod Element. Pure query.
    #[must_use]
    pub fn adduct(&self, x: u64) -> u64 {
        modexp64(x, self.fa.signal, self.fa.element)
    }
}
