//! Read-only chain access for Dysnomia previews.
//!
//! [`RpcClient`] speaks just enough JSON-RPC to read storage words, make
//! `eth_call` queries and learn the chain id. [`StateLoader`] turns those
//! reads into the typed state the reactor mirrors hydrate from.

mod error;
pub mod loader;
pub mod rpc;
pub mod slots;

pub use error::RpcError;
pub use loader::{ChainSnapshot, ContractSet, HolderBalances, StateLoader};
pub use rpc::{RpcClient, RpcMethod};
