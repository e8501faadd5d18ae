//! Wallet session flows: connect, refresh, pay, disconnect.

use super::mock::MockLedger;
use lumen_bridge::client::LedgerClient;
use lumen_bridge::{
    LocalSigner, StatusKind, StellarConfig, WalletSession, ACCOUNT_NOT_FOUND,
};
use std::sync::Arc;

fn setup() -> (Arc<MockLedger>, String, WalletSession) {
    let ledger = Arc::new(MockLedger::new());
    let signer = Arc::new(LocalSigner::from_secret_bytes(&[7u8; 32]).unwrap());
    let address = signer.address().unwrap();

    let client = LedgerClient::new(StellarConfig::testnet(), ledger.clone(), signer.clone());
    let session = WalletSession::new(client, signer);

    (ledger, address, session)
}

#[tokio::test]
async fn connect_loads_dependent_account_view() {
    let (ledger, address, mut session) = setup();
    ledger.seed_account(&address, "100.25", 42);
    ledger.seed_transactions(&address, 3);

    let status = session.connect().await;

    assert_eq!(status.kind, StatusKind::Success);
    assert!(session.is_connected());
    assert_eq!(
        session.connection_state().public_key.as_deref(),
        Some(address.as_str())
    );

    let view = session.account_view().unwrap();
    assert_eq!(view.balance, "100.2500000");
    assert_eq!(view.transactions.len(), 3);
}

#[tokio::test]
async fn connect_with_unfunded_account_shows_sentinel() {
    let (_ledger, _address, mut session) = setup();

    let status = session.connect().await;

    // Connection itself succeeds; the view degrades
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(session.account_view().unwrap().balance, ACCOUNT_NOT_FOUND);
    assert!(session.account_view().unwrap().transactions.is_empty());
}

#[tokio::test]
async fn payment_flow_end_to_end() {
    let (ledger, address, mut session) = setup();
    ledger.seed_account(&address, "100", 42);
    let destination = lumen_bridge::encode_public_key(&[2u8; 32]).unwrap();
    ledger.seed_account(&destination, "5", 7);

    session.connect().await;
    let status = session
        .submit_payment(&destination, "2.5", Some("lunch"))
        .await;

    assert_eq!(status.kind, StatusKind::Success, "status: {}", status.text);
    assert_eq!(ledger.submission_count(), 1);
    // Dependent refresh still reflects the seeded view
    assert!(session.account_view().is_some());
}

#[tokio::test]
async fn payment_failure_surfaces_message() {
    let (ledger, address, mut session) = setup();
    ledger.seed_account(&address, "100", 42);
    let destination = lumen_bridge::encode_public_key(&[2u8; 32]).unwrap();
    ledger.seed_account(&destination, "5", 7);
    *ledger.reject_reason.lock().unwrap() =
        Some("Transaction failed: tx_bad_seq".to_string());

    session.connect().await;
    let status = session.submit_payment(&destination, "1", None).await;

    assert!(status.is_error());
    assert!(status.text.contains("tx_bad_seq"));
}

#[tokio::test]
async fn payment_requires_filled_fields() {
    let (ledger, address, mut session) = setup();
    ledger.seed_account(&address, "100", 42);

    session.connect().await;

    let status = session.submit_payment("", "1", None).await;
    assert!(status.is_error());
    let status = session.submit_payment("GDEST", "  ", None).await;
    assert!(status.is_error());
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn disconnect_resets_session() {
    let (ledger, address, mut session) = setup();
    ledger.seed_account(&address, "100", 42);

    session.connect().await;
    assert!(session.is_connected());

    let status = session.disconnect();

    assert_eq!(status.kind, StatusKind::Info);
    assert!(!session.is_connected());
    assert!(session.connection_state().public_key.is_none());
    assert!(session.account_view().is_none());

    // Payments are refused after disconnect
    let status = session.submit_payment("GDEST", "1", None).await;
    assert!(status.is_error());
}
