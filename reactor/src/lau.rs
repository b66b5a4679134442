//! Identity mirror ("LAU").

use dysnomia_types::{Constants, User};

use crate::math;
use crate::pole::{Charged, Saturated};
use crate::shio::PairedReactor;

/// Outcome of [`IdentityMirror::react`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityReaction {
    pub omicron: u64,
    pub omega: u64,
    pub entropy: u64,
}

/// A user's identity bound to the reactor it reacts through.
#[derive(Debug, Clone)]
pub struct IdentityMirror<'r, R: Charged = Saturated, C: Charged = Saturated> {
    user: User,
    reactor: &'r PairedReactor<R, C>,
}

impl<'r, R: Charged, C: Charged> IdentityMirror<'r, R, C> {
    #[must_use]
    pub fn new(user: User, reactor: &'r PairedReactor<R, C>) -> Self {
        Self { user, reactor }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }

    /// React `Entropy XOR eta` through the Rod against the Cone's channel.
    ///
    /// Only the mirror's own user record changes: On.Omicron and On.Omega take
    /// the reaction's outputs and Entropy becomes the new Kappa.
    pub fn react(&mut self, eta: u64) -> IdentityReaction {
        let input = self.user.entropy ^ eta;
        let reaction = self.reactor.rod().react(input, self.reactor.cone().channel());

        self.user.on.omicron = reaction.eta;
        self.user.on.omega = reaction.kappa;
        self.user.entropy = reaction.kappa;

        IdentityReaction {
            omicron: reaction.eta,
            omega: reaction.kappa,
            entropy: self.user.entropy,
        }
    }

    #[must_use]
    pub fn aura(&self, constants: &Constants) -> u64 {
        math::aura(&self.user.token, constants)
    }
}
