//! Preview requests as JSON callers send them

use dysnomia_preview::{PreviewDispatcher, PreviewError, PreviewRequest};
use dysnomia_types::{Constants, OutputValue};
use serde_json::{Value, json};

fn dispatch(body: Value) -> Result<Value, PreviewError> {
    let request: PreviewRequest = serde_json::from_value(body).unwrap();
    let result = PreviewDispatcher::new(Constants::canonical()).dispatch(&request)?;
    Ok(serde_json::to_value(&result).unwrap())
}

fn buy(operation: &str, amount: Value) -> Value {
    dispatch(json!({"category": "buy", "operation": operation, "params": {"amount": amount}}))
        .unwrap()
}

#[test]
fn buy_previews_truncate_like_the_contract() {
    let math = buy("math", json!("100"));
    assert_eq!(math["operation"], "BuyWithMATH");
    assert_eq!(math["outputs"]["amountIn"], "100");

    let g5 = buy("g5", json!(100));
    assert_eq!(g5["outputs"]["amountIn"], "20");
    assert_eq!(g5["outputs"]["ratio"], "1:5");

    let uneven = buy("g5", json!(9));
    assert_eq!(uneven["outputs"]["amountIn"], "1");
}

#[test]
fn single_pole_react_matches_reference_values() {
    let preview = dispatch(json!({
        "category": "react",
        "operation": "pole",
        "params": {"pi": 100, "channel": 16807, "theta": "953467954114363"},
    }))
    .unwrap();
    assert_eq!(preview["outputs"]["eta"], "911875913983344");
    assert_eq!(preview["outputs"]["kappa"], "562");
    assert_eq!(preview["outputs"]["valid"], true);
    assert_eq!(preview["estimatedGas"], 0);
}

#[test]
fn structural_previews_omit_outputs() {
    let preview =
        dispatch(json!({"category": "react", "operation": "paired", "params": {"pi": 1}})).unwrap();
    assert!(preview.get("outputs").is_none());
    assert!(preview.get("warning").is_none());
    assert!(!preview["steps"].as_array().unwrap().is_empty());
}

#[test]
fn tables_accept_an_empty_operation() {
    let gas = dispatch(json!({"category": "gas"})).unwrap();
    assert!(gas["outputs"].as_object().unwrap().len() > 5);

    let constants = dispatch(json!({"category": "constants", "operation": "table"})).unwrap();
    assert_eq!(constants["outputs"]["motzkinPrime"], "953467954114363");
    assert_eq!(constants["outputs"]["gwatDivisor"], "476733977057179");
}

#[test]
fn unknown_routes_are_rejected() {
    let err = dispatch(json!({"category": "swap", "operation": "x"})).unwrap_err();
    assert_eq!(err, PreviewError::UnknownCategory("swap".to_string()));

    let err = dispatch(json!({"category": "buy", "operation": "doge"})).unwrap_err();
    assert!(matches!(err, PreviewError::UnknownOperation { .. }));
}

#[test]
fn output_numbers_stay_strings() {
    let params = serde_json::from_value(json!({"waat": "0x1b1a5f9a1b0c5c"})).unwrap();
    let request = PreviewRequest::new("qing", "gwat", params);
    let result = PreviewDispatcher::new(Constants::canonical()).dispatch(&request).unwrap();
    let waat = result.get_output("waat").and_then(OutputValue::as_number).unwrap();
    assert_eq!(waat, u64::from_str_radix("1b1a5f9a1b0c5c", 16).unwrap().to_string());
}
