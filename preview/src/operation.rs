//! Closed set of previewable operations.
//!
//! Category and operation names are matched case-insensitively. Anything not
//! listed here is rejected before dispatch.

use std::fmt;
use std::str::FromStr;

use crate::PreviewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Terraform,
    Buy,
    Lau,
    Qing,
    React,
    Gas,
    Ratios,
    Constants,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Terraform,
        Self::Buy,
        Self::Lau,
        Self::Qing,
        Self::React,
        Self::Gas,
        Self::Ratios,
        Self::Constants,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terraform => "terraform",
            Self::Buy => "buy",
            Self::Lau => "lau",
            Self::Qing => "qing",
            Self::React => "react",
            Self::Gas => "gas",
            Self::Ratios => "ratios",
            Self::Constants => "constants",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| PreviewError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerraformOp {
    Alpha,
    Beta,
    Pi,
    Rho,
    Generate,
    Upsilon,
}

/// Tokens Affection can be bought with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuyToken {
    Faung,
    Math,
    Fa,
    G5,
    Pi,
}

impl BuyToken {
    pub const ALL: [Self; 5] = [Self::Faung, Self::Math, Self::Fa, Self::G5, Self::Pi];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Faung => "faung",
            Self::Math => "math",
            Self::Fa => "fa",
            Self::G5 => "g5",
            Self::Pi => "pi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauOp {
    Username,
    Chat,
    Alias,
    Withdraw,
    Void,
    Leave,
    React,
    Aura,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QingOp {
    Join,
    Chat,
    Gwat,
    Admitted,
    Bouncer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactOp {
    Pole,
    Paired,
    Magnetize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Terraform(TerraformOp),
    Buy(BuyToken),
    Lau(LauOp),
    Qing(QingOp),
    React(ReactOp),
    GasTable,
    RatioTable,
    ConstantTable,
}

impl Operation {
    pub fn parse(category: &str, operation: &str) -> Result<Self, PreviewError> {
        let category: Category = category.parse()?;
        let op = operation.trim().to_ascii_lowercase();
        let unknown = || PreviewError::UnknownOperation {
            category: category.to_string(),
            operation: operation.to_string(),
        };

        let parsed = match category {
            Category::Terraform => Self::Terraform(match op.as_str() {
                "alpha" => TerraformOp::Alpha,
                "beta" => TerraformOp::Beta,
                "pi" => TerraformOp::Pi,
                "rho" => TerraformOp::Rho,
                "generate" => TerraformOp::Generate,
                "upsilon" => TerraformOp::Upsilon,
                _ => return Err(unknown()),
            }),
            Category::Buy => {
                let key = op.strip_prefix("buywith").unwrap_or(&op);
                let key = if key == "gimme5" { "g5" } else { key };
                Self::Buy(
                    BuyToken::ALL
                        .into_iter()
                        .find(|t| t.key() == key)
                        .ok_or_else(unknown)?,
                )
            }
            Category::Lau => Self::Lau(match op.as_str() {
                "username" | "setusername" => LauOp::Username,
                "chat" => LauOp::Chat,
                "alias" | "setalias" => LauOp::Alias,
                "withdraw" => LauOp::Withdraw,
                "void" => LauOp::Void,
                "leave" => LauOp::Leave,
                "react" => LauOp::React,
                "aura" => LauOp::Aura,
                _ => return Err(unknown()),
            }),
            Category::Qing => Self::Qing(match op.as_str() {
                "join" => QingOp::Join,
                "chat" => QingOp::Chat,
                "gwat" => QingOp::Gwat,
                "admitted" => QingOp::Admitted,
                "bouncer" => QingOp::Bouncer,
                _ => return Err(unknown()),
            }),
            Category::React => Self::React(match op.as_str() {
                "" | "pole" => ReactOp::Pole,
                "paired" => ReactOp::Paired,
                "magnetize" => ReactOp::Magnetize,
                _ => return Err(unknown()),
            }),
            Category::Gas | Category::Ratios | Category::Constants => {
                if !matches!(op.as_str(), "" | "table") {
                    return Err(unknown());
                }
                match category {
                    Category::Gas => Self::GasTable,
                    Category::Ratios => Self::RatioTable,
                    _ => Self::ConstantTable,
                }
            }
        };
        Ok(parsed)
    }

    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Terraform(_) => Category::Terraform,
            Self::Buy(_) => Category::Buy,
            Self::Lau(_) => Category::Lau,
            Self::Qing(_) => Category::Qing,
            Self::React(_) => Category::React,
            Self::GasTable => Category::Gas,
            Self::RatioTable => Category::Ratios,
            Self::ConstantTable => Category::Constants,
        }
    }
}
