//! Structural previews: what an operation will do, without computed values.

use dysnomia_types::{Address, PreviewResult};
use num_bigint::BigUint;

use crate::gas;
use crate::operation::{LauOp, Operation, QingOp, TerraformOp};
use crate::ratio::ExchangeRatio;

const OWNER_REQUIREMENT: &str = "Must own the contract or have permission";
const LAU_OWNER_REQUIREMENT: &str = "Must own the LAU token";
const CHAT_PREVIEW_CHARS: usize = 50;

/// Shorten a chat message for display.
#[must_use]
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() > CHAT_PREVIEW_CHARS {
        let head: String = message.chars().take(CHAT_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}

// ============================================================================
// Terraform
// ============================================================================

/// `seed` is the alpha/beta input; `a` and `phi` feed upsilon.
#[must_use]
pub fn terraform(op: TerraformOp, seed: u64, phi: bool) -> PreviewResult {
    let gas = gas::estimate(Operation::Terraform(op));
    match op {
        TerraformOp::Alpha => PreviewResult::new("Alpha", gas)
            .formula(
                "Charge → Assert(Sigma>4) → Induce → Torque → Amplify → Sustain → \
                 React → mintToCap",
            )
            .step("Charge", format!("Initialize with seed {seed}"))
            .step("Assert", "Verify Mu.Sigma > 4")
            .step("Induce", "First transformation via modExp")
            .step("Torque", "Second transformation")
            .step("Amplify", "Third transformation")
            .step("Sustain", "Fourth transformation")
            .step("React", "Final modExp: Eta = Pi^Channel mod Theta")
            .step("mintToCap", "Mint 1 token if below cap")
            .requirement(OWNER_REQUIREMENT)
            .warning("Coordinates will be permanently changed"),
        TerraformOp::Beta => PreviewResult::new("Beta", gas)
            .formula("Torque(Rod,b) → Amplify → Sustain → React(Rod,Cone) → React(Cone,Rod)")
            .step("Torque", format!("Torque(Mu.Rod, {seed})"))
            .step("Amplify", "Amplify(Mu.Rod, Mu.Rod.Alpha)")
            .step("Sustain", "Sustain(Mu.Rod, Mu.Rod.Alpha)")
            .step("React Rod", "React(Mu.Rod, Mu.Rod.Alpha, Mu.Cone.Dynamo)")
            .step("React Cone", "React(Mu.Cone, Mu.Rod.Alpha, Mu.Rod.Dynamo)")
            .requirement(OWNER_REQUIREMENT)
            .warning("Rod coordinates will be primarily affected"),
        TerraformOp::Pi => PreviewResult::new("Pi", gas)
            .formula(
                "Torque(Cone,Rod.Kappa) → Amplify → Sustain → React(Rod,Cone) → React(Cone,Cone)",
            )
            .step("Torque", "Torque(Mu.Cone, Mu.Rod.Kappa)")
            .step("Amplify", "Amplify(Mu.Cone, Mu.Cone.Alpha)")
            .step("Sustain", "Sustain(Mu.Cone, Mu.Cone.Alpha)")
            .step("React Rod", "React(Mu.Rod, Mu.Cone.Alpha, Mu.Rod.Channel)")
            .step("React Cone", "React(Mu.Cone, Mu.Cone.Alpha, Mu.Cone.Channel)")
            .requirement(OWNER_REQUIREMENT)
            .warning("Cone coordinates will be primarily affected"),
        TerraformOp::Rho => PreviewResult::new("Rho", gas)
            .formula("Torque → Amplify → Sustain → React x2 → Omega XOR= Rod.Kappa")
            .step("Torque", "Apply torque transformation")
            .step("Amplify", "Amplify coordinates")
            .step("Sustain", "Sustain transformation")
            .step("React", "Dual React operations")
            .step("XOR Omega", "Mu.Omega = Mu.Omega XOR Mu.Rod.Kappa")
            .requirement(OWNER_REQUIREMENT)
            .note("Accumulates changes into Omega"),
        TerraformOp::Generate => PreviewResult::new("Generate", gas)
            .formula(
                "Amplify → Sustain → React x2 → Omega XOR= Rod.Kappa → \
                 Upsilon XOR= Ohm XOR Pi → return Upsilon",
            )
            .step("Amplify", "Amplify Cone with Upsilon")
            .step("Sustain", "Sustain Cone with Ohm")
            .step("React", "Dual React on both poles")
            .step("XOR Omega", "Mu.Omega = Mu.Omega XOR Mu.Rod.Kappa")
            .step("XOR Upsilon", "Mu.Upsilon = Mu.Upsilon XOR Mu.Ohm XOR Mu.Pi")
            .step("Return", "Returns new Upsilon value")
            .requirement(OWNER_REQUIREMENT)
            .note("Returns a pseudo-random coordinate value"),
        TerraformOp::Upsilon => {
            let formula = if phi {
                format!("Mu.Upsilon = {seed} XOR Mu.Ohm XOR Mu.Pi")
            } else {
                format!("Mu.Upsilon = {seed} XOR Mu.Ohm")
            };
            PreviewResult::new("Upsilon", gas)
                .formula(formula)
                .step(
                    "XOR",
                    if phi { "Triple XOR with Ohm and Pi" } else { "XOR with Ohm only" },
                )
                .step("Store", "Update Mu.Upsilon")
                .requirement(OWNER_REQUIREMENT)
                .note("This is predictable if you know current Ohm and Pi values")
        }
    }
}

// ============================================================================
// Buy
// ============================================================================

/// Purchase outline for `amount` Affection paid to `affection`.
#[must_use]
pub fn buy(ratio: &ExchangeRatio, amount: &BigUint, affection: &Address) -> PreviewResult {
    let cost = ratio.cost(amount);
    PreviewResult::new(
        format!("BuyWith{}", ratio.name),
        gas::estimate(Operation::Buy(ratio.token)),
    )
        .formula(format!("amountIn = {amount} × {} / {}", ratio.input, ratio.output))
        .step("Approve", format!("approve({affection}, {cost})"))
        .step("Buy", format!("BuyWith{}({amount})", ratio.name))
        .requirement(format!(
            "Approve {cost} {} to Affection contract ({affection})",
            ratio.name
        ))
        .requirement(format!("Have sufficient {} balance", ratio.name))
}

// ============================================================================
// LAU
// ============================================================================

/// Text inputs for LAU previews.
#[derive(Debug, Clone, Default)]
pub struct LauInputs {
    pub username: String,
    pub message: String,
    pub token: String,
    pub amount: String,
    pub alias_target: String,
    pub alias_value: String,
}

#[must_use]
pub fn lau(op: LauOp, inputs: &LauInputs) -> PreviewResult {
    let gas = gas::estimate(Operation::Lau(op));
    match op {
        LauOp::Username => PreviewResult::new("Set Username", gas)
            .formula(format!("Username({:?})", inputs.username))
            .requirement(LAU_OWNER_REQUIREMENT)
            .effect(format!("Username attribute set to {:?}", inputs.username))
            .effect("Log event emitted")
            .effect("mintToCap() called"),
        LauOp::Chat => PreviewResult::new("Chat", gas)
            .formula(format!("Chat({:?})", truncate_message(&inputs.message)))
            .requirement(LAU_OWNER_REQUIREMENT)
            .requirement("Must be admitted to a QING")
            .requirement("Cover charge paid (if applicable)")
            .effect("LogEvent emitted with message"),
        LauOp::Alias => PreviewResult::new("Set Alias", gas)
            .formula(format!("Alias({}, {:?})", inputs.alias_target, inputs.alias_value))
            .requirement(LAU_OWNER_REQUIREMENT)
            .effect(format!(
                "Alias for {} set to {:?}",
                inputs.alias_target, inputs.alias_value
            )),
        LauOp::Withdraw => PreviewResult::new("Withdraw", gas)
            .formula(format!("Withdraw({}, {})", inputs.token, inputs.amount))
            .requirement(LAU_OWNER_REQUIREMENT)
            .requirement(format!("LAU must have >= {} of token", inputs.amount))
            .effect(format!("{} tokens transferred to your wallet", inputs.amount)),
        LauOp::Void => PreviewResult::new("Void (Reset)", gas)
            .requirement(LAU_OWNER_REQUIREMENT)
            .requirement("Must pass really1=true AND really2=true")
            .effect("LAU state COMPLETELY RESET")
            .effect("New Saat values generated")
            .effect("New On (Bao) created")
            .warning("THIS IS IRREVERSIBLE! All your coordinates will be lost!"),
        LauOp::Leave => PreviewResult::new("Leave", gas)
            .requirement(LAU_OWNER_REQUIREMENT)
            .effect("Current area cleared"),
        LauOp::React => PreviewResult::new("React", gas)
            .formula("Rod.React(Entropy XOR eta, Cone.Channel)")
            .step("XOR", "input = Entropy XOR eta")
            .step("React", "React(Mu.Rod, input, Mu.Cone.Channel)")
            .step("Store", "On.Omicron = Eta; On.Omega = Kappa; Entropy = Kappa")
            .requirement(LAU_OWNER_REQUIREMENT),
        LauOp::Aura => PreviewResult::new("Aura", gas).formula("uint160(address) mod MotzkinPrime"),
    }
}

// ============================================================================
// QING
// ============================================================================

#[must_use]
pub fn qing(op: QingOp, message: &str) -> PreviewResult {
    let gas = gas::estimate(Operation::Qing(op));
    match op {
        QingOp::Join => PreviewResult::new("Join QING", gas)
            .step("Bouncer", "Staff, 25+ CROWS, or >= 1/BouncerDivisor of the asset supply")
            .step("Cover", "Pay CoverCharge in the asset token unless on the guest list")
            .step("Guest list", "Admission lasts 1 day (block.timestamp + 1 days)")
            .step("Enter", "CHO.Enter(userToken) if not already entered")
            .effect("User added to guest list for 24 hours")
            .effect("User can chat in the QING")
            .effect("Cover charge (if any) will be transferred"),
        QingOp::Chat => PreviewResult::new("QING Chat", gas)
            .formula(format!("Chat({:?})", truncate_message(message)))
            .requirement("Must be admitted to the QING")
            .effect("LogEvent emitted with message"),
        QingOp::Gwat => PreviewResult::new("GWAT", gas).formula("Waat mod GwatDivisor != 0"),
        QingOp::Admitted => PreviewResult::new("Admitted", gas)
            .formula("CoverCharge == 0 OR GuestList[userToken] > asOf"),
        QingOp::Bouncer => PreviewResult::new("Bouncer", gas).formula(
            "staff OR (!NoCROWS AND CROWS >= 25e18) OR asset >= totalSupply / BouncerDivisor",
        ),
    }
}
