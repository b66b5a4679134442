//! Fixed-width modular exponentiation.
//!
//! Every derivation in the reactor reduces to `base^exponent mod modulus`,
//! evaluated over arbitrary-precision integers and then folded back into the
//! 64-bit result domain the contracts store.
//!
//! A modulus of 0 or 1 yields 0. The contracts behave the same way, so this is
//! a defined result rather than an error.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use dysnomia_types::{Address, Constants};

/// `base^exponent mod modulus` by square-and-multiply.
#[must_use]
pub fn modexp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() || modulus.is_one() {
        return BigUint::zero();
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exponent = exponent.clone();

    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = (&result * &base) % modulus;
        }
        exponent >>= 1u32;
        base = (&base * &base) % modulus;
    }

    result
}

/// [`modexp`] folded into the 64-bit domain (`mod Uint64Max + 1`).
#[must_use]
pub fn modexp64(base: u64, exponent: u64, modulus: u64) -> u64 {
    wrap64(&modexp(
        &BigUint::from(base),
        &BigUint::from(exponent),
        &BigUint::from(modulus),
    ))
}

/// Low 64 bits of `value`.
#[must_use]
pub fn wrap64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}

/// Outcome of a single React evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub eta: u64,
    pub kappa: u64,
}

impl Reaction {
    /// A reaction reverts on-chain when either output is zero.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.eta != 0 && self.kappa != 0
    }
}

/// `Eta = pi^channel mod theta`, `Kappa = pi^theta mod channel`.
#[must_use]
pub fn react(pi: u64, channel: u64, theta: u64) -> Reaction {
    Reaction {
        eta: modexp64(pi, channel, theta),
        kappa: modexp64(pi, theta, channel),
    }
}

/// Aura of an address: `uint160(address) mod GlobalModulus`.
#[must_use]
pub fn aura(address: &Address, constants: &Constants) -> u64 {
    wrap64(&(address.to_uint() % BigUint::from(constants.modulus())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dysnomia_types::MOTZKIN_PRIME;

    fn reference(base: u64, exponent: u64, modulus: u64) -> u64 {
        if modulus < 2 {
            return 0;
        }
        wrap64(&BigUint::from(base).modpow(&BigUint::from(exponent), &BigUint::from(modulus)))
    }

    #[test]
    fn small_domain_sweep_matches_naive_power() {
        for modulus in 2u64..24 {
            for base in 0u64..24 {
                let mut expected = 1 % modulus;
                for exponent in 0u64..24 {
                    assert_eq!(
                        modexp64(base, exponent, modulus),
                        expected,
                        "{base}^{exponent} mod {modulus}"
                    );
                    expected = expected * base % modulus;
                }
            }
        }
    }

    #[test]
    fn randomized_large_values_match_reference() {
        for _ in 0..256 {
            let base = rand::random::<u64>();
            let exponent = rand::random::<u64>();
            let modulus = rand::random::<u64>() | 2;
            assert_eq!(
                modexp64(base, exponent, modulus),
                reference(base, exponent, modulus),
                "{base}^{exponent} mod {modulus}"
            );
        }
    }

    #[test]
    fn full_width_intermediates_are_exact() {
        let base = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
        let exponent = BigUint::from(u128::MAX);
        let modulus = BigUint::from(u64::MAX) + BigUint::from(12_345u32);
        assert_eq!(
            modexp(&base, &exponent, &modulus),
            base.modpow(&exponent, &modulus)
        );
    }

    #[test]
    fn modulus_zero_and_one_yield_zero() {
        for (base, exponent) in [(0, 0), (7, 5), (u64::MAX, u64::MAX), (1, 0)] {
            assert_eq!(modexp64(base, exponent, 0), 0);
            assert_eq!(modexp64(base, exponent, 1), 0);
        }
    }

    #[test]
    fn zero_exponent_is_one_for_real_moduli() {
        assert_eq!(modexp64(0, 0, 2), 1);
        assert_eq!(modexp64(12_345, 0, MOTZKIN_PRIME), 1);
    }

    #[test]
    fn channel_of_small_pole() {
        assert_eq!(modexp64(7, 5, MOTZKIN_PRIME), 16_807);
    }

    #[test]
    fn react_against_the_motzkin_prime() {
        let reaction = react(100, 16_807, MOTZKIN_PRIME);
        assert_eq!(reaction.eta, 911_875_913_983_344);
        assert_eq!(reaction.kappa, 562);
        assert_eq!(reaction.eta, reference(100, 16_807, MOTZKIN_PRIME));
        assert_eq!(reaction.kappa, reference(100, MOTZKIN_PRIME, 16_807));
        assert!(reaction.is_valid());
    }

    #[test]
    fn react_with_degenerate_channel_is_invalid() {
        let reaction = react(100, 1, MOTZKIN_PRIME);
        assert_eq!(reaction.kappa, 0);
        assert!(!reaction.is_valid());
    }

    #[test]
    fn aura_reduces_address_by_modulus() {
        let constants = Constants::canonical();
        let addr: Address = "0x0000000000000000000000000000000000000100".parse().unwrap();
        assert_eq!(aura(&addr, &constants), 256);

        let addr: Address = "0x24F0154C1dCe548AdF15da2098Fdd8B8A3B8151D".parse().unwrap();
        let expected = addr.to_uint() % BigUint::from(MOTZKIN_PRIME);
        assert_eq!(BigUint::from(aura(&addr, &constants)), expected);
        assert!(aura(&addr, &constants) < MOTZKIN_PRIME);
    }
}
