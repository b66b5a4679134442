//! Exchange ratios for buying Affection.

use num_bigint::BigUint;

use crate::operation::BuyToken;

/// `input` units of the payment token buy `output` units of Affection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRatio {
    pub token: BuyToken,
    pub input: u32,
    pub output: u32,
    pub name: &'static str,
    pub contract: &'static str,
}

impl ExchangeRatio {
    #[must_use]
    pub const fn of(token: BuyToken) -> Self {
        let (input, output, name, contract) = match token {
            BuyToken::Faung => (2, 1, "Faung", "libDynamic"),
            BuyToken::Math => (1, 1, "MATH", "libAtropaMath"),
            BuyToken::Fa => (4, 1, "Fa", "libConjecture"),
            BuyToken::G5 => (1, 5, "Gimme5", "Gimme5"),
            BuyToken::Pi => (1, 300, "pINDEPENDENCE", "pINDEPENDENCE"),
        };
        Self {
            token,
            input,
            output,
            name,
            contract,
        }
    }

    /// Payment needed for `amount` Affection: `amount * input / output`,
    /// truncated.
    #[must_use]
    pub fn cost(&self, amount: &BigUint) -> BigUint {
        amount * self.input / self.output
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.input, self.output)
    }
}
