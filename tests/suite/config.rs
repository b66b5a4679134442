//! Config file driving a hydrated preview

use std::fs;

use dysnomia_chain::ContractSet;
use dysnomia_config::DysnomiaConfig;
use dysnomia_preview::{Params, PreviewDispatcher, PreviewRequest};
use dysnomia_reactor::Territory;
use dysnomia_types::{Constants, OutputValue};
use tempfile::TempDir;

use crate::common::{AFFECTION, Storage, addr, loader, mount_node, reference_reactor};

#[tokio::test]
async fn configured_contracts_hydrate_a_preview() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            r#"
[rpc]
timeout_secs = 5

[contracts]
affection = "{AFFECTION}"

[territory]
waat = "476733977057180"
entropy = 3
"#
        ),
    )
    .unwrap();

    let config = DysnomiaConfig::load_from(&path).unwrap().unwrap();
    assert_eq!(config.timeout_secs(), 5);
    let contracts = config.contracts.as_ref().unwrap();
    assert_eq!(contracts.affection, Some(addr(AFFECTION)));

    let reactor = reference_reactor();
    let mut storage = Storage::default();
    storage.set_fa(AFFECTION, 7, reactor.rod().fa());
    storage.set_fa(AFFECTION, 11, reactor.cone().fa());
    let server = wiremock::MockServer::start().await;
    mount_node(&server, 369, storage).await;

    let set = ContractSet {
        affection: contracts.affection,
        ..ContractSet::default()
    };
    let snapshot = loader(&server).snapshot(&set, None).await.unwrap();

    let section = config.territory.as_ref().unwrap();
    let territory = Territory::new(
        section.waat.clone().unwrap(),
        section.entropy.unwrap_or(0),
        &Constants::canonical(),
    );
    assert!(territory.is_gwat());
    assert_eq!(territory.entropy(), 3);

    let dispatcher = PreviewDispatcher::new(Constants::canonical())
        .with_territory(territory)
        .with_snapshot(snapshot);
    let mut params = Params::new();
    params.insert("pi", "100");
    let result = dispatcher
        .dispatch(&PreviewRequest::new("react", "paired", params))
        .unwrap();
    assert_eq!(
        result.get_output("valid").and_then(OutputValue::as_flag),
        Some(true)
    );
}

#[test]
fn missing_config_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let loaded = DysnomiaConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(loaded.is_none());
}
