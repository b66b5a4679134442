//! Static gas estimates.

use crate::operation::{LauOp, Operation, QingOp, TerraformOp};

const ALPHA: u64 = 300_000;
const BETA: u64 = 250_000;
const PI: u64 = 250_000;
const RHO: u64 = 280_000;
const UPSILON: u64 = 80_000;
const GENERATE: u64 = 300_000;
const BUY: u64 = 120_000;
const SET_USERNAME: u64 = 120_000;
const CHAT: u64 = 80_000;
const SET_ALIAS: u64 = 100_000;
const WITHDRAW: u64 = 80_000;
const VOID: u64 = 500_000;
const LEAVE: u64 = 80_000;
const JOIN: u64 = 100_000;
const QING_CHAT: u64 = 80_000;
const REACT: u64 = 150_000;
const APPROVE: u64 = 50_000;
const ENTER: u64 = 500_000;

/// Named estimates in presentation order.
pub const TABLE: &[(&str, u64)] = &[
    ("alpha", ALPHA),
    ("beta", BETA),
    ("pi", PI),
    ("rho", RHO),
    ("upsilon", UPSILON),
    ("generate", GENERATE),
    ("buyWithFaung", BUY),
    ("buyWithMATH", BUY),
    ("buyWithFa", BUY),
    ("buyWithG5", BUY),
    ("buyWithPI", BUY),
    ("setUsername", SET_USERNAME),
    ("chat", CHAT),
    ("setAlias", SET_ALIAS),
    ("withdraw", WITHDRAW),
    ("void", VOID),
    ("leave", LEAVE),
    ("join", JOIN),
    ("qingChat", QING_CHAT),
    ("react", REACT),
    ("approve", APPROVE),
    ("enter", ENTER),
];

/// Estimate for submitting `op`. Read-only queries cost nothing.
#[must_use]
pub const fn estimate(op: Operation) -> u64 {
    match op {
        Operation::Terraform(t) => match t {
            TerraformOp::Alpha => ALPHA,
            TerraformOp::Beta => BETA,
            TerraformOp::Pi => PI,
            TerraformOp::Rho => RHO,
            TerraformOp::Generate => GENERATE,
            TerraformOp::Upsilon => UPSILON,
        },
        Operation::Buy(_) => BUY,
        Operation::Lau(l) => match l {
            LauOp::Username => SET_USERNAME,
            LauOp::Chat => CHAT,
            LauOp::Alias => SET_ALIAS,
            LauOp::Withdraw => WITHDRAW,
            LauOp::Void => VOID,
            LauOp::Leave => LEAVE,
            LauOp::React => REACT,
            LauOp::Aura => 0,
        },
        Operation::Qing(q) => match q {
            QingOp::Join => JOIN,
            QingOp::Chat => QING_CHAT,
            QingOp::Gwat | QingOp::Admitted | QingOp::Bouncer => 0,
        },
        Operation::React(_)
        | Operation::GasTable
        | Operation::RatioTable
        | Operation::ConstantTable => 0,
    }
}
