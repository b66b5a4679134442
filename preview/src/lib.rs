//! Operation previews for Dysnomia.
//!
//! A [`PreviewRequest`] names a category, an operation and loose parameters.
//! [`PreviewDispatcher`] parses it into a closed [`Operation`] and returns a
//! [`PreviewResult`](dysnomia_types::PreviewResult): computed outputs where the
//! math can be mirrored (and the needed state is hydrated), otherwise a
//! structural description of what the contract call will do.

pub mod describe;
pub mod dispatcher;
mod error;
pub mod gas;
pub mod operation;
pub mod params;
pub mod ratio;

pub use dispatcher::{DEFAULT_AFFECTION_ADDRESS, PreviewDispatcher, PreviewRequest};
pub use error::PreviewError;
pub use operation::{BuyToken, Category, LauOp, Operation, QingOp, ReactOp, TerraformOp};
pub use params::Params;
pub use ratio::ExchangeRatio;
