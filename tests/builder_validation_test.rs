//! Asset parameter validation through the builder
//!
//! Every rejection happens locally, before anything is signed or sent.

use asa_client::tx_builder::{
    AssetControls, AssetParams, SuggestedParams, TransactionBuilderError, TxBuilder,
    TICKET_UNIT_NAME,
};
use asa_client::Address;

fn builder() -> TxBuilder {
    TxBuilder::new(SuggestedParams::from_round(10, 1_000, "testnet-v1.0", [4u8; 32]))
}

fn creator() -> Address {
    Address::new([11u8; 32])
}

fn rejected_field(params: AssetParams) -> &'static str {
    match builder().create_asset(creator(), params, None) {
        Err(TransactionBuilderError::InvalidField { field, .. }) => field,
        other => panic!("expected InvalidField, got {:?}", other),
    }
}

#[test]
fn test_asset_name_too_long() {
    let name = "N".repeat(33);
    assert_eq!(rejected_field(AssetParams::token(name, "TKN", 100, 2, "")), "asset_name");
}

#[test]
fn test_unit_name_too_long() {
    assert_eq!(
        rejected_field(AssetParams::token("Token", "TOOLONGUN", 100, 2, "")),
        "unit_name"
    );
}

#[test]
fn test_decimals_above_maximum() {
    assert_eq!(rejected_field(AssetParams::token("Token", "TKN", 100, 20, "")), "decimals");
}

#[test]
fn test_default_frozen_needs_freeze_address() {
    let params = AssetParams::token("Token", "TKN", 100, 0, "").with_default_frozen(true);
    assert_eq!(rejected_field(params), "freeze");

    let params = AssetParams::token("Token", "TKN", 100, 0, "")
        .with_controls(AssetControls {
            freeze: Some(creator()),
            ..AssetControls::none()
        })
        .with_default_frozen(true);
    assert!(builder().create_asset(creator(), params, None).is_ok());
}

#[test]
fn test_limits_are_inclusive() {
    let params = AssetParams::token("N".repeat(32), "EIGHTCHR", 1, 19, "u".repeat(96));
    assert!(builder().create_asset(creator(), params, None).is_ok());
}

#[test]
fn test_event_ticket_preset() {
    let params = AssetParams::event_ticket(creator(), "Concert", 500, "https://tickets");
    assert_eq!(params.unit_name, TICKET_UNIT_NAME);
    assert_eq!(params.decimals, 0);
    assert_eq!(params.controls.freeze, Some(creator()));
    assert!(builder().create_asset(creator(), params, None).is_ok());
}

#[test]
fn test_validation_errors_are_not_retryable() {
    let err = builder()
        .create_asset(creator(), AssetParams::token("T", "T", 0, 0, ""), None)
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!err.is_retryable());
}

#[test]
fn test_update_without_roles_rejected() {
    let err = builder()
        .update_asset(creator(), 77, AssetControls::none(), None)
        .unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::InvalidField { field: "controls", .. }
    ));

    let destroy = builder().destroy_asset(creator(), 77, None).unwrap();
    let update = builder()
        .update_asset(
            creator(),
            77,
            AssetControls {
                manager: Some(creator()),
                ..AssetControls::none()
            },
            None,
        )
        .unwrap();
    assert_ne!(
        update.primary().id().unwrap(),
        destroy.primary().id().unwrap()
    );
}
