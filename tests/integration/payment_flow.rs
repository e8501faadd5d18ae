//! Payment and query flows through `LedgerClient` against the mock ledger.

use super::mock::MockLedger;
use base64::{engine::general_purpose, Engine as _};
use lumen_bridge::client::LedgerClient;
use lumen_bridge::{
    encode_public_key, LedgerApi, LocalSigner, PaymentError, PaymentRequest, StellarConfig,
    ACCOUNT_NOT_FOUND,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn setup() -> (Arc<MockLedger>, Arc<LocalSigner>, LedgerClient) {
    let ledger = Arc::new(MockLedger::new());
    let signer = Arc::new(LocalSigner::from_secret_bytes(&[7u8; 32]).unwrap());
    let client = LedgerClient::new(
        StellarConfig::testnet(),
        ledger.clone(),
        signer.clone(),
    );
    (ledger, signer, client)
}

fn source_address(signer: &LocalSigner) -> String {
    signer.address().unwrap()
}

fn other_address(seed: u8) -> String {
    encode_public_key(&[seed; 32]).unwrap()
}

/// Operation type discriminant of the first operation in an envelope built
/// without a memo: envelope type (4) + muxed source (36) + fee (4) +
/// sequence (8) + time preconditions (20) + memo none (4) + op count (4) +
/// op source flag (4) puts the discriminant at bytes 84..88.
fn first_op_type(envelope_b64: &str) -> u32 {
    let bytes = general_purpose::STANDARD.decode(envelope_b64).unwrap();
    u32::from_be_bytes(bytes[84..88].try_into().unwrap())
}

// ==================== Account Queries ====================

#[tokio::test]
async fn balance_is_formatted_to_seven_decimals() {
    let (ledger, signer, client) = setup();
    let address = source_address(&signer);
    ledger.seed_account(&address, "250.5", 100);

    let balance = client.get_account_balance(&address).await.unwrap();
    assert_eq!(balance, "250.5000000");
}

#[tokio::test]
async fn missing_account_balance_returns_sentinel() {
    let (_ledger, _signer, client) = setup();

    let balance = client.get_account_balance(&other_address(9)).await.unwrap();
    assert_eq!(balance, ACCOUNT_NOT_FOUND);
}

#[tokio::test]
async fn transaction_listing_failure_degrades_to_empty() {
    let (ledger, signer, client) = setup();
    let address = source_address(&signer);
    ledger.seed_transactions(&address, 5);
    ledger.fail_listings.store(true, Ordering::SeqCst);

    let transactions = client.get_recent_transactions(&address, 10).await;
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn transaction_listing_honors_limit() {
    let (ledger, signer, client) = setup();
    let address = source_address(&signer);
    ledger.seed_transactions(&address, 15);

    let transactions = client.get_recent_transactions(&address, 10).await;
    assert_eq!(transactions.len(), 10);
}

#[tokio::test]
async fn account_info_propagates_not_found() {
    let (_ledger, _signer, client) = setup();

    let result = client.get_account_info(&other_address(9)).await;
    assert!(matches!(result, Err(PaymentError::AccountNotFound(_))));
}

#[tokio::test]
async fn trading_pairs_capped_at_twenty() {
    let (ledger, _signer, client) = setup();
    ledger.seed_assets(25);

    let pairs = client.get_trading_pairs().await;
    assert_eq!(pairs.len(), 20);
    assert_eq!(pairs[0].code, "AST0");
}

#[tokio::test]
async fn trading_pairs_failure_degrades_to_empty() {
    let (ledger, _signer, client) = setup();
    ledger.seed_assets(5);
    ledger.fail_listings.store(true, Ordering::SeqCst);

    let pairs = client.get_trading_pairs().await;
    assert!(pairs.is_empty());
}

// ==================== Payments ====================

fn payment(source: &str, destination: &str, amount: &str) -> PaymentRequest {
    PaymentRequest {
        source: source.to_string(),
        destination: destination.to_string(),
        amount: amount.to_string(),
        memo: None,
    }
}

#[tokio::test]
async fn payment_to_existing_account_uses_payment_op() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let destination = other_address(2);
    ledger.seed_account(&source, "100", 50);
    ledger.seed_account(&destination, "10", 7);

    let result = client.send_payment(payment(&source, &destination, "2.5")).await;

    assert!(result.success, "error: {:?}", result.error);
    assert!(result.tx_hash.is_some());
    assert!(result.explorer_url.unwrap().contains("testnet"));

    let submissions = ledger.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    // PAYMENT = 1
    assert_eq!(first_op_type(&submissions[0]), 1);
}

#[tokio::test]
async fn payment_to_missing_account_switches_to_create_account() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let destination = other_address(2);
    ledger.seed_account(&source, "100", 50);

    let result = client.send_payment(payment(&source, &destination, "1")).await;

    assert!(result.success, "error: {:?}", result.error);

    let submissions = ledger.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    // CREATE_ACCOUNT = 0
    assert_eq!(first_op_type(&submissions[0]), 0);
}

#[tokio::test]
async fn payment_below_creation_minimum_fails_before_submission() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let destination = other_address(2);
    ledger.seed_account(&source, "100", 50);

    let result = client.send_payment(payment(&source, &destination, "0.5")).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Minimum 1 XLM"));
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn malformed_destination_fails_before_any_network_call() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    ledger.seed_account(&source, "100", 50);

    let result = client
        .send_payment(payment(&source, "not-an-address", "1"))
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Invalid Stellar address"));
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn non_positive_amount_is_rejected_locally() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let destination = other_address(2);
    ledger.seed_account(&source, "100", 50);
    ledger.seed_account(&destination, "10", 7);

    for amount in ["0", "-1", "abc"] {
        let result = client.send_payment(payment(&source, &destination, amount)).await;
        assert!(!result.success, "amount {} should fail", amount);
    }
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn ledger_rejection_surfaces_decoded_reason() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let destination = other_address(2);
    ledger.seed_account(&source, "100", 50);
    ledger.seed_account(&destination, "10", 7);
    *ledger.reject_reason.lock().unwrap() =
        Some("Transaction failed: tx_insufficient_balance".to_string());

    let result = client.send_payment(payment(&source, &destination, "2")).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("tx_insufficient_balance"));
}

// ==================== Trustlines ====================

#[tokio::test]
async fn trustline_uses_change_trust_op() {
    let (ledger, signer, client) = setup();
    let source = source_address(&signer);
    let issuer = other_address(3);
    ledger.seed_account(&source, "100", 50);

    let result = client.create_trustline(&source, "USDC", &issuer, None).await;

    assert!(result.success, "error: {:?}", result.error);

    let submissions = ledger.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    // CHANGE_TRUST = 6
    assert_eq!(first_op_type(&submissions[0]), 6);
}

// ==================== Faucet ====================

#[tokio::test]
async fn faucet_funding_reports_boolean() {
    let (ledger, _signer, client) = setup();
    let address = other_address(4);

    assert!(client.fund_test_account(&address).await);
    assert!(ledger.account_exists(&address).await.unwrap());

    ledger.faucet_works.store(false, Ordering::SeqCst);
    assert!(!client.fund_test_account(&other_address(5)).await);
}
