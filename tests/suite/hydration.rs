//! Chain hydration against a mock JSON-RPC node

use dysnomia_chain::{ChainSnapshot, ContractSet, RpcError};
use dysnomia_preview::{Params, PreviewDispatcher, PreviewRequest};
use dysnomia_reactor::Territory;
use dysnomia_types::{Constants, OutputValue, PreviewResult};
use num_bigint::BigUint;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    AFFECTION, ASSET, CROWS, HOLDER, LAU, Storage, addr, balance_of_data, loader, mount_call,
    mount_node, reference_reactor,
};

fn reference_storage() -> Storage {
    let reactor = reference_reactor();
    let mut storage = Storage::default();
    storage.set_fa(AFFECTION, 7, reactor.rod().fa());
    storage.set_fa(AFFECTION, 11, reactor.cone().fa());
    // Phi, Eta, Xi, Sigma
    storage.set(AFFECTION, 15, [1, 2, 424_242, 5]);
    // Rho, Upsilon, Ohm, Pi
    storage.set(AFFECTION, 16, [0, 0b1010, 0b0110, 0b0011]);
    // Omicron, Omega, Chi, RodKappa
    storage.set(AFFECTION, 17, [0, 0b1111_0000, 0, 0b0101_0101]);
    // LAU Saat: Pole, Soul, Aura
    storage.set(LAU, 10, [9, 0, 0, 0]);
    storage.set(LAU, 11, [4242, 0, 0, 0]);
    storage.set(LAU, 12, [4512, 0, 0, 0]);
    storage
}

fn contracts() -> ContractSet {
    ContractSet {
        affection: Some(addr(AFFECTION)),
        lau: Some(addr(LAU)),
        ..ContractSet::default()
    }
}

async fn hydrated_snapshot() -> ChainSnapshot {
    let server = MockServer::start().await;
    mount_node(&server, 369, reference_storage()).await;
    loader(&server).snapshot(&contracts(), None).await.unwrap()
}

async fn hydrated_dispatcher() -> PreviewDispatcher {
    PreviewDispatcher::new(Constants::canonical()).with_snapshot(hydrated_snapshot().await)
}

fn preview(
    dispatcher: &PreviewDispatcher,
    category: &str,
    operation: &str,
    params: serde_json::Value,
) -> PreviewResult {
    let params: Params = serde_json::from_value(params).unwrap();
    dispatcher
        .dispatch(&PreviewRequest::new(category, operation, params))
        .unwrap()
}

fn number(result: &PreviewResult, name: &str) -> String {
    result
        .get_output(name)
        .and_then(OutputValue::as_number)
        .unwrap_or_else(|| panic!("missing output {name}"))
        .to_string()
}

fn flag(result: &PreviewResult, name: &str) -> bool {
    result
        .get_output(name)
        .and_then(OutputValue::as_flag)
        .unwrap_or_else(|| panic!("missing output {name}"))
}

#[tokio::test]
async fn snapshot_round_trips_reactor_storage() {
    let snapshot = hydrated_snapshot().await;
    let reactor = reference_reactor();

    assert_eq!(snapshot.chain_id, 369);
    let affection = snapshot.affection.as_ref().unwrap();
    assert_eq!(&affection.rod, reactor.rod().fa());
    assert_eq!(&affection.cone, reactor.cone().fa());
    assert_eq!(affection.xi, 424_242);
    assert_eq!(affection.rod_kappa, 0b0101_0101);

    let lau = snapshot.lau.as_ref().unwrap();
    assert_eq!(lau.address, addr(LAU));
    assert_eq!(lau.soul().value(), 4242);
    assert_eq!(lau.aura(), 4512);
    assert!(snapshot.holder.is_none());
}

#[tokio::test]
async fn hydrated_paired_react_matches_reference() {
    let dispatcher = hydrated_dispatcher().await;

    let result = preview(&dispatcher, "react", "paired", json!({"pi": 100}));
    assert_eq!(number(&result, "omicron"), "160068274413576");
    assert_eq!(number(&result, "omega"), "215046422782071");
    assert!(flag(&result, "valid"));
    assert!(result.warning_text().is_none());
}

#[tokio::test]
async fn hydrated_magnetize_is_symmetric() {
    let dispatcher = hydrated_dispatcher().await;

    let result = preview(&dispatcher, "react", "magnetize", json!({}));
    assert_eq!(number(&result, "manifold"), "212790853694341");
    assert_eq!(number(&result, "ring"), "1217648716005635");
    assert_eq!(number(&result, "barn"), "1616409578591257");
    assert!(flag(&result, "symmetric"));
}

#[tokio::test]
async fn hydrated_lau_react_chains_entropy() {
    let snapshot = hydrated_snapshot().await;
    let dispatcher = PreviewDispatcher::new(Constants::canonical()).with_snapshot(snapshot);
    let reactor = reference_reactor();

    let result = preview(&dispatcher, "lau", "react", json!({"eta": 5, "entropy": "12"}));
    let expected = reactor.rod().react(12 ^ 5, reactor.cone().channel());
    assert_eq!(number(&result, "omicron"), expected.eta.to_string());
    assert_eq!(number(&result, "entropy"), expected.kappa.to_string());
    assert_eq!(number(&result, "soul"), "4242");
}

#[tokio::test]
async fn hydrated_terraform_folds_stored_scalars() {
    let dispatcher = hydrated_dispatcher().await;

    let rho = preview(&dispatcher, "terraform", "rho", json!({}));
    assert_eq!(number(&rho, "omega"), (0b1111_0000u64 ^ 0b0101_0101).to_string());

    let upsilon = preview(&dispatcher, "terraform", "upsilon", json!({"a": 8}));
    assert_eq!(number(&upsilon, "upsilon"), (8u64 ^ 0b0110).to_string());
}

#[tokio::test]
async fn bouncer_uses_holder_balances() {
    let server = MockServer::start().await;
    mount_node(&server, 369, Storage::default()).await;
    mount_call(&server, ASSET, &balance_of_data(HOLDER), 4).await;
    mount_call(&server, ASSET, "0x18160ddd", 128).await;
    mount_call(&server, CROWS, &balance_of_data(HOLDER), 0).await;

    let contracts = ContractSet {
        qing_asset: Some(addr(ASSET)),
        crows: Some(addr(CROWS)),
        ..ContractSet::default()
    };
    let snapshot = loader(&server)
        .snapshot(&contracts, Some(addr(HOLDER)))
        .await
        .unwrap();
    let holder = snapshot.holder.as_ref().unwrap();
    assert_eq!(holder.asset, BigUint::from(4u32));
    assert_eq!(holder.asset_total_supply, BigUint::from(128u32));

    let territory = Territory::new(BigUint::from(7u32), 0, &Constants::canonical());
    let dispatcher = PreviewDispatcher::new(Constants::canonical())
        .with_territory(territory)
        .with_snapshot(snapshot);
    let result = preview(&dispatcher, "qing", "bouncer", json!({"address": HOLDER}));
    assert!(flag(&result, "bouncer"));
}

#[tokio::test]
async fn rpc_failure_aborts_hydration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let err = loader(&server).snapshot(&contracts(), None).await.unwrap_err();
    assert!(matches!(err, RpcError::Status { status: 502, .. }));
}
