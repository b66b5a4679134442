//! Request routing.
//!
//! [`PreviewDispatcher`] owns the constants, the optional hydrated snapshot
//! and the optional territory. Every request works on copies of that state,
//! so dispatching never changes what the next request sees.

use dysnomia_chain::ChainSnapshot;
use dysnomia_reactor::qing::{self, BouncerBalances};
use dysnomia_reactor::{IdentityMirror, PairedReactor, Terraform, Territory, math};
use dysnomia_types::{Address, AffectionState, Constants, OutputValue, PreviewResult, User};
use serde::{Deserialize, Serialize};

use crate::describe::{self, LauInputs};
use crate::gas;
use crate::operation::{BuyToken, LauOp, Operation, QingOp, ReactOp, TerraformOp};
use crate::params::Params;
use crate::ratio::ExchangeRatio;
use crate::PreviewError;

/// The Affection contract on PulseChain.
pub const DEFAULT_AFFECTION_ADDRESS: Address = Address::new([
    0x24, 0xf0, 0x15, 0x4c, 0x1d, 0xce, 0x54, 0x8a, 0xdf, 0x15, 0xda, 0x20, 0x98, 0xfd, 0xd8, 0xb8,
    0xa3, 0xb8, 0x15, 0x1d,
]);

const HYDRATED_NOTE: &str = "Computed from hydrated chain state";
const ENTROPY_UNKNOWN: &str =
    "Identity entropy is not part of the snapshot; pass entropy=<current value> to compute";
const GUEST_LIST_UNKNOWN: &str = "Cover charge applies and this token's guest-list expiry \
    is not loaded; pass guestList=<expiry> to compute";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub category: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub params: Params,
}

impl PreviewRequest {
    pub fn new(category: impl Into<String>, operation: impl Into<String>, params: Params) -> Self {
        Self {
            category: category.into(),
            operation: operation.into(),
            params,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewDispatcher {
    constants: Constants,
    snapshot: Option<ChainSnapshot>,
    territory: Option<Territory>,
    affection_address: Address,
}

impl PreviewDispatcher {
    #[must_use]
    pub fn new(constants: Constants) -> Self {
        Self {
            constants,
            snapshot: None,
            territory: None,
            affection_address: DEFAULT_AFFECTION_ADDRESS,
        }
    }

    pub fn with_snapshot(mut self, snapshot: ChainSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_territory(mut self, territory: Territory) -> Self {
        self.territory = Some(territory);
        self
    }

    pub fn with_affection_address(mut self, address: Address) -> Self {
        self.affection_address = address;
        self
    }

    #[must_use]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&ChainSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn dispatch(&self, request: &PreviewRequest) -> Result<PreviewResult, PreviewError> {
        let op = Operation::parse(&request.category, &request.operation)?;
        tracing::debug!(?op, hydrated = self.snapshot.is_some(), "Dispatching preview");
        self.preview(op, &request.params)
    }

    pub fn preview(&self, op: Operation, params: &Params) -> Result<PreviewResult, PreviewError> {
        match op {
            Operation::Terraform(t) => self.terraform(t, params),
            Operation::Buy(token) => self.buy(token, params),
            Operation::Lau(l) => self.lau(l, params),
            Operation::Qing(q) => self.qing(q, params),
            Operation::React(r) => self.react(r, params),
            Operation::GasTable => Ok(gas_table()),
            Operation::RatioTable => Ok(ratio_table()),
            Operation::ConstantTable => Ok(self.constant_table()),
        }
    }

    fn affection(&self) -> Option<&AffectionState> {
        self.snapshot.as_ref()?.affection.as_ref()
    }

    // ========================================================================
    // Terraform
    // ========================================================================

    fn terraform(&self, op: TerraformOp, params: &Params) -> Result<PreviewResult, PreviewError> {
        let seed = match op {
            TerraformOp::Alpha | TerraformOp::Upsilon => params.u64_or("a", 0)?,
            TerraformOp::Beta => params.u64_or("b", 0)?,
            TerraformOp::Pi | TerraformOp::Rho | TerraformOp::Generate => 0,
        };
        let phi = params.flag("phi")?;
        let preview = describe::terraform(op, seed, phi);

        let Some(state) = self.affection() else {
            return Ok(preview);
        };
        let mut terraform = Terraform::hydrate(state, &self.constants);
        let preview = match op {
            TerraformOp::Alpha | TerraformOp::Beta | TerraformOp::Pi => return Ok(preview),
            TerraformOp::Upsilon => preview.output(
                "upsilon",
                OutputValue::number(terraform.upsilon(seed, phi)),
            ),
            TerraformOp::Rho => preview
                .output("omega", OutputValue::number(terraform.rho()))
                .output("rodKappa", OutputValue::number(terraform.rod_kappa())),
            TerraformOp::Generate => {
                let upsilon = terraform.generate();
                preview
                    .output("upsilon", OutputValue::number(upsilon))
                    .output("omega", OutputValue::number(terraform.omega()))
                    .output("rodKappa", OutputValue::number(terraform.rod_kappa()))
            }
        };
        Ok(preview.note(format!(
            "{HYDRATED_NOTE}; folds use the stored Rod Kappa, before this call's own reactions"
        )))
    }

    // ========================================================================
    // Buy
    // ========================================================================

    fn buy(&self, token: BuyToken, params: &Params) -> Result<PreviewResult, PreviewError> {
        let ratio = ExchangeRatio::of(token);
        let amount = params.uint_or_zero("amount")?;
        let cost = ratio.cost(&amount);
        Ok(describe::buy(&ratio, &amount, &self.affection_address)
            .output("amountOut", OutputValue::number(&amount))
            .output("amountIn", OutputValue::number(&cost))
            .output("token", OutputValue::Text(ratio.name.to_string()))
            .output("tokenContract", OutputValue::Text(ratio.contract.to_string()))
            .output("ratio", OutputValue::Text(ratio.label())))
    }

    // ========================================================================
    // LAU
    // ========================================================================

    fn lau(&self, op: LauOp, params: &Params) -> Result<PreviewResult, PreviewError> {
        match op {
            LauOp::React => self.lau_react(params),
            LauOp::Aura => self.lau_aura(params),
            LauOp::Username
            | LauOp::Chat
            | LauOp::Alias
            | LauOp::Withdraw
            | LauOp::Void
            | LauOp::Leave => {
                let amount = params.uint_or_zero("amount")?;
                let inputs = LauInputs {
                    username: params.text("username"),
                    message: params.text("message"),
                    token: params.text("token"),
                    amount: amount.to_string(),
                    alias_target: params.text("address"),
                    alias_value: params.text("value"),
                };
                Ok(describe::lau(op, &inputs))
            }
        }
    }

    fn lau_react(&self, params: &Params) -> Result<PreviewResult, PreviewError> {
        let eta = params.u64("eta")?;
        let preview = describe::lau(LauOp::React, &LauInputs::default());

        let Some(snapshot) = &self.snapshot else {
            return Ok(preview);
        };
        let (Some(affection), Some(lau)) = (&snapshot.affection, &snapshot.lau) else {
            return Ok(preview);
        };
        if !params.contains("entropy") {
            return Ok(preview.warning(ENTROPY_UNKNOWN));
        }

        let reactor = PairedReactor::hydrate(affection.rod, affection.cone, &self.constants);
        let user = User {
            soul: lau.soul(),
            token: lau.address,
            entropy: params.u64("entropy")?,
            username: lau.username.clone(),
            ..User::default()
        };
        let mut mirror = IdentityMirror::new(user, &reactor);
        let reaction = mirror.react(eta);
        Ok(preview
            .output("soul", OutputValue::number(lau.soul()))
            .output("omicron", OutputValue::number(reaction.omicron))
            .output("omega", OutputValue::number(reaction.omega))
            .output("entropy", OutputValue::number(reaction.entropy))
            .note(HYDRATED_NOTE))
    }

    fn lau_aura(&self, params: &Params) -> Result<PreviewResult, PreviewError> {
        let hydrated = self.snapshot.as_ref().and_then(|s| s.lau.as_ref());
        let address = match (params.optional_address("address")?, hydrated) {
            (Some(address), _) => address,
            (None, Some(lau)) => lau.address,
            (None, None) => return Err(PreviewError::MissingParam("address".to_string())),
        };
        let mut preview = describe::lau(LauOp::Aura, &LauInputs::default())
            .output("address", OutputValue::Text(address.to_string()))
            .output("aura", OutputValue::number(math::aura(&address, &self.constants)));
        if let Some(lau) = hydrated.filter(|lau| lau.address == address) {
            preview = preview.output("storedAura", OutputValue::number(lau.aura()));
        }
        Ok(preview)
    }

    // ========================================================================
    // QING
    // ========================================================================

    fn qing(&self, op: QingOp, params: &Params) -> Result<PreviewResult, PreviewError> {
        let preview = describe::qing(op, &params.text("message"));
        match op {
            QingOp::Chat => Ok(preview),
            QingOp::Gwat => {
                let waat = params.uint("waat")?;
                Ok(preview
                    .output("waat", OutputValue::number(&waat))
                    .output("gwat", OutputValue::Flag(qing::is_gwat(&waat, &self.constants))))
            }
            QingOp::Join => {
                let Some(territory) = &self.territory else {
                    return Ok(preview);
                };
                let token = params.address("token")?;
                let now = params.u64("now")?;
                let Some(mut territory) = seeded_territory(territory, token, params)? else {
                    return Ok(preview.warning(GUEST_LIST_UNKNOWN));
                };
                let admitted_before = territory.is_admitted(&token, now);
                let admission = territory.join(token, now);
                Ok(preview
                    .output("admittedBefore", OutputValue::Flag(admitted_before))
                    .output("expiresAt", OutputValue::number(admission.expires_at))
                    .output("extended", OutputValue::Flag(admission.extended))
                    .output("gwat", OutputValue::Flag(territory.is_gwat())))
            }
            QingOp::Admitted => {
                let Some(territory) = &self.territory else {
                    return Ok(preview);
                };
                let token = params.address("token")?;
                let at = params.u64("at")?;
                let Some(territory) = seeded_territory(territory, token, params)? else {
                    return Ok(preview.warning(GUEST_LIST_UNKNOWN));
                };
                Ok(preview
                    .output("admitted", OutputValue::Flag(territory.is_admitted(&token, at)))
                    .output("coverCharge", OutputValue::number(&territory.cover_charge)))
            }
            QingOp::Bouncer => {
                let address = params.address("address")?;
                let holder = self
                    .snapshot
                    .as_ref()
                    .and_then(|s| s.holder.as_ref())
                    .filter(|h| h.holder == address);
                let (Some(territory), Some(holder)) = (&self.territory, holder) else {
                    return Ok(preview);
                };
                let balances = BouncerBalances {
                    asset: holder.asset.clone(),
                    total_supply: holder.asset_total_supply.clone(),
                    crows: holder.crows.clone(),
                };
                Ok(preview
                    .output("bouncer", OutputValue::Flag(territory.is_bouncer(&address, &balances)))
                    .note(HYDRATED_NOTE))
            }
        }
    }

    // ========================================================================
    // React
    // ========================================================================

    fn react(&self, op: ReactOp, params: &Params) -> Result<PreviewResult, PreviewError> {
        let gas = gas::estimate(Operation::React(op));
        match op {
            ReactOp::Pole => {
                let pi = params.u64("pi")?;
                let channel = params.u64("channel")?;
                let theta = params.u64("theta")?;
                let reaction = math::react(pi, channel, theta);
                Ok(PreviewResult::new("React", gas)
                    .formula(format!(
                        "Eta = {pi}^{channel} mod {theta} = {}; \
                         Kappa = {pi}^{theta} mod {channel} = {}",
                        reaction.eta, reaction.kappa
                    ))
                    .output("eta", OutputValue::number(reaction.eta))
                    .output("kappa", OutputValue::number(reaction.kappa))
                    .output("valid", OutputValue::Flag(reaction.is_valid())))
            }
            ReactOp::Paired => {
                let pi = params.u64("pi")?;
                let preview = PreviewResult::new("Paired React", gas)
                    .formula(
                        "input = pi XOR Monopole; Rod.React(input, Cone.Channel); \
                         Cone.React(input, Rod.Channel)",
                    )
                    .step("XOR", "input = pi XOR Monopole")
                    .step("React Rod", "React(Rod, input, Cone.Channel)")
                    .step("React Cone", "React(Cone, input, Rod.Channel)")
                    .step("Verify", "Rod.Kappa == Cone.Eta AND Rod.Eta == Cone.Kappa");
                let Some(state) = self.affection() else {
                    return Ok(preview);
                };
                let reactor = PairedReactor::hydrate(state.rod, state.cone, &self.constants);
                let reaction = reactor.react(pi);
                let mut preview = preview
                    .output("input", OutputValue::number(reaction.input))
                    .output("omicron", OutputValue::number(reaction.omicron()))
                    .output("omega", OutputValue::number(reaction.omega()))
                    .output("rodEta", OutputValue::number(reaction.rod.eta))
                    .output("rodKappa", OutputValue::number(reaction.rod.kappa))
                    .output("valid", OutputValue::Flag(reaction.is_valid()));
                if let Err(asymmetry) = reaction.verify() {
                    preview = preview.warning(format!("{asymmetry}; this call would revert"));
                }
                Ok(preview.note(HYDRATED_NOTE))
            }
            ReactOp::Magnetize => {
                let preview = PreviewResult::new("Magnetize", gas)
                    .formula(
                        "Manifold = Rod.Adduct(Cone.Dynamo); \
                         Ring = Rod.Coordinate^Manifold mod Rod.Element; \
                         Barn = Ring^Manifold mod Rod.Element",
                    )
                    .step("Adduct", "Manifold = Cone.Dynamo^Rod.Signal mod Rod.Element")
                    .step("Ring", "Ring = Rod.Coordinate^Manifold mod Rod.Element")
                    .step("Barn", "Barn = Ring^Manifold mod Rod.Element")
                    .step("Verify", "Cone.Coordinate^Manifold mod Rod.Element == Ring");
                let Some(state) = self.affection() else {
                    return Ok(preview);
                };
                let mut reactor = PairedReactor::hydrate(state.rod, state.cone, &self.constants);
                let handshake = reactor.magnetize();
                let mut preview = preview
                    .output("manifold", OutputValue::number(handshake.manifold))
                    .output("ring", OutputValue::number(handshake.ring))
                    .output("coneRing", OutputValue::number(handshake.cone_ring))
                    .output("barn", OutputValue::number(handshake.barn))
                    .output("monopole", OutputValue::number(reactor.monopole()))
                    .output("symmetric", OutputValue::Flag(handshake.is_symmetric()));
                if let Err(asymmetry) = handshake.verify() {
                    preview = preview.warning(format!("{asymmetry}; this call would revert"));
                }
                Ok(preview.note(HYDRATED_NOTE))
            }
        }
    }

    // ========================================================================
    // Tables
    // ========================================================================

    fn constant_table(&self) -> PreviewResult {
        let c = &self.constants;
        PreviewResult::new("Constants", gas::estimate(Operation::ConstantTable))
            .output("motzkinPrime", OutputValue::number(c.modulus()))
            .output("uint64Max", OutputValue::number(c.uint64_max()))
            .output("gwatDivisor", OutputValue::number(c.gwat_divisor()))
            .output("gua", OutputValue::number(c.gua()))
    }
}

/// A copy of `territory` carrying the token's guest-list expiry from the
/// `guestList` param. `None` when a cover charge applies and the expiry is
/// still unknown, since admission would then be guessed.
fn seeded_territory(
    territory: &Territory,
    token: Address,
    params: &Params,
) -> Result<Option<Territory>, PreviewError> {
    let mut territory = territory.clone();
    if params.contains("guestList") {
        territory.set_guest_list_entry(token, params.u64("guestList")?);
    }
    if territory.charges_cover() && !territory.has_guest_list_entry(&token) {
        return Ok(None);
    }
    Ok(Some(territory))
}

fn gas_table() -> PreviewResult {
    let preview = PreviewResult::new("Gas Estimates", gas::estimate(Operation::GasTable));
    gas::TABLE.iter().fold(preview, |preview, (name, gas)| {
        preview.output(*name, OutputValue::number(gas))
    })
}

fn ratio_table() -> PreviewResult {
    let preview = PreviewResult::new("Exchange Ratios", gas::estimate(Operation::RatioTable));
    BuyToken::ALL
        .into_iter()
        .map(ExchangeRatio::of)
        .fold(preview, |preview, ratio| {
            let key = ratio.token.key();
            preview
                .output(format!("{key}.ratio"), OutputValue::Text(ratio.label()))
                .output(format!("{key}.token"), OutputValue::Text(ratio.name.to_string()))
                .output(format!("{key}.contract"), OutputValue::Text(ratio.contract.to_string()))
        })
}
