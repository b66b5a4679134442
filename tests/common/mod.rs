//! Shared test utilities and fixtures
//!
//! A mock JSON-RPC node backed by an in-memory storage map.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use dysnomia_chain::{RpcClient, StateLoader};
use dysnomia_reactor::{PairedReactor, Pole};
use dysnomia_types::{Address, Constants, Fa};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const AFFECTION: &str = "0x24f0154c1dce548adf15da2098fdd8b8a3b8151d";
pub const LAU: &str = "0x00000000000000000000000000000000000011a0";
pub const ASSET: &str = "0x000000000000000000000000000000000000a55e";
pub const CROWS: &str = "0x203e366a1821570b2f84ff5ae8b3bdeb48dc4fa1";
pub const HOLDER: &str = "0x1111111111111111111111111111111111111111";

pub fn addr(raw: &str) -> Address {
    raw.parse().expect("test address is valid")
}

/// The reference pairing used across the suite.
pub fn reference_reactor() -> PairedReactor {
    let constants = Constants::canonical();
    PairedReactor::generate(
        Pole::new(7, 1_234_567, 89_101, &constants),
        Pole::new(11, 7_654_321, 31_337, &constants),
        424_242,
        1001,
        2002,
    )
}

/// Storage words keyed by (lowercase contract, slot), as four u64 lanes.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    words: HashMap<(String, u64), [u64; 4]>,
}

impl Storage {
    pub fn set(&mut self, contract: &str, slot: u64, lanes: [u64; 4]) {
        self.words.insert((contract.to_ascii_lowercase(), slot), lanes);
    }

    /// Lay out an `Fa` over four consecutive slots.
    pub fn set_fa(&mut self, contract: &str, first_slot: u64, fa: &Fa) {
        let fields = fa.fields();
        for (i, chunk) in fields.chunks(4).enumerate() {
            let mut lanes = [0u64; 4];
            lanes[..chunk.len()].copy_from_slice(chunk);
            self.set(contract, first_slot + i as u64, lanes);
        }
    }

    fn word_hex(&self, contract: &str, slot: u64) -> String {
        let lanes = self
            .words
            .get(&(contract.to_ascii_lowercase(), slot))
            .copied()
            .unwrap_or_default();
        format!(
            "0x{:016x}{:016x}{:016x}{:016x}",
            lanes[3], lanes[2], lanes[1], lanes[0]
        )
    }
}

fn rpc_result(id: &Value, result: impl Into<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"jsonrpc": "2.0", "id": id, "result": result.into()}))
}

/// Mount `eth_chainId` and an `eth_getStorageAt` responder over `storage`.
pub async fn mount_node(server: &MockServer, chain_id: u64, storage: Storage) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_chainId"})))
        .respond_with(move |req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            rpc_result(&body["id"], format!("0x{chain_id:x}"))
        })
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_getStorageAt"})))
        .respond_with(move |req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let contract = body["params"][0].as_str().unwrap();
            let slot = u64::from_str_radix(
                body["params"][1].as_str().unwrap().trim_start_matches("0x"),
                16,
            )
            .unwrap();
            rpc_result(&body["id"], storage.word_hex(contract, slot))
        })
        .mount(server)
        .await;
}

/// Mount an `eth_call` answer for calldata sent to `to`.
pub async fn mount_call(server: &MockServer, to: &str, data: &str, value: u128) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_call",
            "params": [{"to": to.to_ascii_lowercase(), "data": data}, "latest"],
        })))
        .respond_with(move |req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            rpc_result(&body["id"], format!("0x{value:064x}"))
        })
        .mount(server)
        .await;
}

pub fn balance_of_data(holder: &str) -> String {
    format!("0x70a08231{}{}", "0".repeat(24), holder.trim_start_matches("0x").to_ascii_lowercase())
}

pub fn loader(server: &MockServer) -> StateLoader {
    let rpc = RpcClient::new(
        server.uri().parse().expect("mock uri is a url"),
        Duration::from_secs(5),
    )
    .expect("client builds");
    StateLoader::new(rpc)
}
