use thiserror::Error;

/// The two poles of a paired reactor did not derive the same handshake value.
///
/// This is a simulation result ("this input would revert on-chain"), not a
/// process failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pairing asymmetry: rod derived {rod}, cone derived {cone}")]
pub struct PairingAsymmetry {
    pub rod: u64,
    pub cone: u64,
}
