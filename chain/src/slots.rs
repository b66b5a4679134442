//! Storage slot layout and 32-byte word decoding.
//!
//! Words arrive as big-endian hex. Packed u64 fields are read in lanes,
//! least-significant first: lane k covers bits 64k..64k+63.

use dysnomia_types::{Address, AffectionState, Fa, LauState};
use num_bigint::BigUint;

use crate::RpcError;

// ============================================================================
// Layout
// ============================================================================

/// First slot of the Rod's `Fa` (four fields per slot, declaration order).
pub const AFFECTION_ROD_SLOT: u64 = 7;
/// First slot of the Cone's `Fa`.
pub const AFFECTION_CONE_SLOT: u64 = 11;
/// Scalar words: (Phi, Eta, Xi, Sigma), (Rho, Upsilon, Ohm, Pi) and
/// (Omicron, Omega, Chi, RodKappa).
pub const AFFECTION_SCALAR_SLOTS: [u64; 3] = [15, 16, 17];

/// Slots occupied by one `Fa` (13 fields in 4 lanes per slot).
pub const FA_SLOT_SPAN: u64 = Fa::FIELD_COUNT.div_ceil(LANES) as u64;

/// LAU `Saat[0..3]`, one full word each.
pub const LAU_SAAT_SLOTS: [u64; 3] = [10, 11, 12];

pub const SELECTOR_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
pub const SELECTOR_TOTAL_SUPPLY: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];

const LANES: usize = 4;
const WORD_HEX_DIGITS: usize = 64;

// ============================================================================
// Words
// ============================================================================

/// One storage word as four u64 lanes, least-significant lane first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Word([u64; LANES]);

impl Word {
    #[must_use]
    pub const fn from_lanes(lanes: [u64; LANES]) -> Self {
        Self(lanes)
    }

    /// Parse an `0x`-prefixed big-endian hex word. Nodes may drop leading
    /// zeros, so anything up to 64 digits is accepted.
    pub fn from_hex(raw: &str) -> Result<Self, RpcError> {
        let value = parse_hex_uint(raw)?;
        let digits = raw.len() - 2;
        if digits > WORD_HEX_DIGITS {
            return Err(RpcError::Malformed(format!(
                "storage word has {digits} hex digits"
            )));
        }
        let mut lanes = [0u64; LANES];
        for (lane, digit) in lanes.iter_mut().zip(value.iter_u64_digits()) {
            *lane = digit;
        }
        Ok(Self(lanes))
    }

    /// u64 at lane `k` (bits 64k..64k+63).
    #[must_use]
    pub fn lane(&self, k: usize) -> u64 {
        self.0.get(k).copied().unwrap_or(0)
    }

    /// Low 64 bits of the word.
    #[must_use]
    pub const fn low_u64(&self) -> u64 {
        self.0[0]
    }

    #[must_use]
    pub const fn lanes(&self) -> [u64; LANES] {
        self.0
    }
}

/// Parse `0x`-prefixed big-endian hex into an unsigned integer. `0x` alone is
/// zero.
pub fn parse_hex_uint(raw: &str) -> Result<BigUint, RpcError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Malformed(format!("expected 0x-prefixed hex, got {raw:?}")))?;
    if digits.is_empty() {
        return Ok(BigUint::default());
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RpcError::Malformed(format!("invalid hex: {raw:?}")));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| RpcError::Malformed(format!("invalid hex: {raw:?}")))
}

#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// `0x`-prefixed 32-byte slot index.
#[must_use]
pub fn slot_key(slot: u64) -> String {
    format!("0x{slot:064x}")
}

// ============================================================================
// Decoding
// ============================================================================

/// Rebuild an `Fa` from its consecutive slots. Missing trailing lanes read as
/// zero.
#[must_use]
pub fn decode_fa(words: &[Word]) -> Fa {
    let mut fields = [0u64; Fa::FIELD_COUNT];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = words.get(i / LANES).map_or(0, |w| w.lane(i % LANES));
    }
    Fa::from_fields(fields)
}

/// Assemble Affection storage from the Rod slots, Cone slots and the three
/// scalar words, in layout order.
#[must_use]
pub fn decode_affection(rod: &[Word], cone: &[Word], scalars: [Word; 3]) -> AffectionState {
    let [a, b, c] = scalars;
    AffectionState {
        rod: decode_fa(rod),
        cone: decode_fa(cone),
        phi: a.lane(0),
        eta: a.lane(1),
        xi: a.lane(2),
        sigma: a.lane(3),
        rho: b.lane(0),
        upsilon: b.lane(1),
        ohm: b.lane(2),
        pi: b.lane(3),
        omicron: c.lane(0),
        omega: c.lane(1),
        chi: c.lane(2),
        rod_kappa: c.lane(3),
    }
}

#[must_use]
pub fn decode_saat(words: [Word; 3]) -> [u64; 3] {
    words.map(|w| w.low_u64())
}

/// Fill in the chain-backed parts of `LauState`.
#[must_use]
pub fn decode_lau(address: Address, saat: [Word; 3]) -> LauState {
    LauState {
        address,
        saat: decode_saat(saat),
        ..LauState::default()
    }
}
