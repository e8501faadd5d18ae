// ============================================================================
// LUMEN-BRIDGE - Ledger Client
// ============================================================================
// High-level client for account queries and payment submission. This is the
// surface the UI layer talks to.
//
// Read contracts differ deliberately:
// - balance lookup maps a missing account to a sentinel string
// - transaction and asset listings degrade to empty on failure
// - full account info propagates failures to the caller
// Mutating operations (payment, trustline) always return an explicit
// PaymentResult and never raise.
// ============================================================================

use crate::amount::{format_amount, validate_amount};
use crate::config::StellarConfig;
use crate::error::PaymentError;
use crate::horizon::{AccountInfo, AssetRecord, LedgerApi, TransactionRecord};
use crate::signer::{SigningRequest, WalletSigner};
use crate::strkey::is_valid_address;
use crate::transaction::{Operation, SignedEnvelope, TransactionBuilder};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Sentinel returned by `get_account_balance` for unknown accounts
pub const ACCOUNT_NOT_FOUND: &str = "Account not found";

/// Default number of transactions listed per account
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 10;

/// Maximum number of assets returned by `get_trading_pairs`
const MAX_TRADING_PAIRS: u32 = 20;

/// Minimum starting balance when a payment creates the destination account
const ACCOUNT_CREATION_MINIMUM_XLM: f64 = 1.0;

// ============================================================================
// REQUEST / RESULT TYPES
// ============================================================================

/// One payment as submitted from the UI. Transient, used once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub source: String,
    pub destination: String,
    pub amount: String,
    pub memo: Option<String>,
}

/// Result of a payment or trustline submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub success: bool,
    pub tx_hash: Option<String>,
    pub explorer_url: Option<String>,
    pub error: Option<String>,
}

impl PaymentResult {
    fn submitted(hash: String, explorer_url: String) -> Self {
        Self {
            success: true,
            tx_hash: Some(hash),
            explorer_url: Some(explorer_url),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            tx_hash: None,
            explorer_url: None,
            error: Some(error),
        }
    }
}

/// Transaction summary for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub successful: bool,
}

impl From<TransactionRecord> for TransactionSummary {
    fn from(record: TransactionRecord) -> Self {
        Self {
            hash: record.hash,
            created_at: record.created_at,
            successful: record.successful,
        }
    }
}

/// Issued-asset summary for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub code: String,
    pub issuer: String,
    pub amount: String,
    pub num_accounts: u32,
}

impl From<AssetRecord> for AssetSummary {
    fn from(record: AssetRecord) -> Self {
        Self {
            code: record.asset_code,
            issuer: record.asset_issuer,
            amount: record.amount,
            num_accounts: record.num_accounts,
        }
    }
}

// ============================================================================
// LEDGER CLIENT
// ============================================================================

/// High-level ledger client
pub struct LedgerClient {
    config: StellarConfig,
    api: Arc<dyn LedgerApi>,
    signer: Arc<dyn WalletSigner>,
}

impl LedgerClient {
    /// Create new client over a ledger API and a signer
    pub fn new(
        config: StellarConfig,
        api: Arc<dyn LedgerApi>,
        signer: Arc<dyn WalletSigner>,
    ) -> Self {
        Self {
            config,
            api,
            signer,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &StellarConfig {
        &self.config
    }

    // ==================== Account Queries ====================

    /// Get the native balance of an account, formatted to 7 decimal places.
    ///
    /// A missing account maps to the `ACCOUNT_NOT_FOUND` sentinel; other
    /// failures propagate.
    pub async fn get_account_balance(&self, address: &str) -> Result<String> {
        match self.api.load_account(address).await {
            Ok(account) => Ok(account
                .native_balance()
                .map(format_amount)
                .unwrap_or_else(|| "0".to_string())),
            Err(PaymentError::AccountNotFound(_)) => Ok(ACCOUNT_NOT_FOUND.to_string()),
            Err(e) => Err(e),
        }
    }

    /// List the most recent transactions for an account, newest first.
    ///
    /// Best-effort: any failure degrades to an empty list.
    pub async fn get_recent_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Vec<TransactionSummary> {
        match self.api.list_transactions(address, limit).await {
            Ok(records) => records.into_iter().map(TransactionSummary::from).collect(),
            Err(e) => {
                warn!("Failed to list transactions for {}: {}", address, e);
                Vec::new()
            }
        }
    }

    /// Read-only projection of an account's full public state.
    ///
    /// Unlike the balance and transaction reads, failures propagate.
    pub async fn get_account_info(&self, address: &str) -> Result<AccountInfo> {
        self.api.load_account(address).await
    }

    /// List known issued assets with circulating amount and holder count.
    ///
    /// Best-effort: any failure degrades to an empty list.
    pub async fn get_trading_pairs(&self) -> Vec<AssetSummary> {
        match self.api.list_assets(MAX_TRADING_PAIRS).await {
            Ok(records) => records
                .into_iter()
                .take(MAX_TRADING_PAIRS as usize)
                .map(AssetSummary::from)
                .collect(),
            Err(e) => {
                warn!("Failed to list assets: {}", e);
                Vec::new()
            }
        }
    }

    // ==================== Mutating Operations ====================

    /// Send a native-asset payment.
    ///
    /// Loads the source account, probes the destination (switching to account
    /// creation if it is missing), fetches the current base fee, builds a
    /// transaction with a 30-second validity window, requests a signature
    /// from the wallet, and submits. Every failure path is captured in the
    /// returned `PaymentResult`.
    pub async fn send_payment(&self, request: PaymentRequest) -> PaymentResult {
        match self.send_payment_inner(&request).await {
            Ok(result) => {
                info!(
                    "Payment sent: {} XLM -> {}",
                    request.amount, request.destination
                );
                result
            }
            Err(e) => {
                warn!("Payment failed: {}", e);
                PaymentResult::failed(e.to_string())
            }
        }
    }

    async fn send_payment_inner(&self, request: &PaymentRequest) -> Result<PaymentResult> {
        // Local validation before any network call
        if !is_valid_address(&request.destination) {
            return Err(PaymentError::InvalidStellarAddress(
                request.destination.clone(),
            ));
        }
        let amount = validate_amount(&request.amount)?;

        let source_account = self.api.load_account(&request.source).await?;
        let destination_exists = self.api.account_exists(&request.destination).await?;
        let fee = self.api.fetch_base_fee().await?;

        let operation = outgoing_operation(destination_exists, &request.destination, &amount)?;

        let mut builder = TransactionBuilder::new(&self.config, &source_account)
            .fee(fee)
            .add_operation(operation);

        if let Some(memo) = request.memo.as_deref().filter(|m| !m.is_empty()) {
            builder = builder.memo_text(memo);
        }

        let unsigned = builder.build()?;
        let signed = self.sign_and_submit(&request.source, unsigned).await?;
        Ok(signed)
    }

    /// Establish a trustline for an issued asset.
    ///
    /// Same build/sign/submit shape and error-capture discipline as
    /// `send_payment`.
    pub async fn create_trustline(
        &self,
        source: &str,
        asset_code: &str,
        issuer: &str,
        limit: Option<&str>,
    ) -> PaymentResult {
        match self.create_trustline_inner(source, asset_code, issuer, limit).await {
            Ok(result) => {
                info!("Trustline created: {}:{}", asset_code, issuer);
                result
            }
            Err(e) => {
                warn!("Trustline creation failed: {}", e);
                PaymentResult::failed(e.to_string())
            }
        }
    }

    async fn create_trustline_inner(
        &self,
        source: &str,
        asset_code: &str,
        issuer: &str,
        limit: Option<&str>,
    ) -> Result<PaymentResult> {
        if !is_valid_address(issuer) {
            return Err(PaymentError::InvalidStellarAddress(issuer.to_string()));
        }

        let source_account = self.api.load_account(source).await?;
        let fee = self.api.fetch_base_fee().await?;

        let unsigned = TransactionBuilder::new(&self.config, &source_account)
            .fee(fee)
            .change_trust(asset_code, issuer, limit)
            .build()?;

        self.sign_and_submit(source, unsigned).await
    }

    async fn sign_and_submit(
        &self,
        source: &str,
        unsigned: crate::transaction::UnsignedTransaction,
    ) -> Result<PaymentResult> {
        let envelope_xdr = unsigned.envelope_xdr()?;

        let signing_request = SigningRequest {
            network_passphrase: self.config.network_passphrase.clone(),
            public_key: source.to_string(),
        };

        let signed_xdr = self
            .signer
            .sign_transaction(&envelope_xdr, &signing_request)
            .await?;

        let envelope = SignedEnvelope::from_xdr(&signed_xdr)?;
        let response = self.api.submit_transaction(envelope.as_xdr()).await?;

        Ok(PaymentResult::submitted(
            response.hash.clone(),
            self.config.explorer_tx_url(&response.hash),
        ))
    }

    // ==================== Testnet Utilities ====================

    /// Fund an account via the testnet faucet. Fire-and-forget, no retry.
    pub async fn fund_test_account(&self, address: &str) -> bool {
        match self.api.friendbot_fund(address).await {
            Ok(()) => {
                info!("Friendbot funded account: {}", address);
                true
            }
            Err(e) => {
                warn!("Friendbot funding failed: {}", e);
                false
            }
        }
    }
}

/// Pick the outgoing operation for a payment.
///
/// A missing destination switches the payment to account creation, which the
/// ledger only accepts with a starting balance of at least 1 XLM.
fn outgoing_operation(
    destination_exists: bool,
    destination: &str,
    amount: &str,
) -> Result<Operation> {
    if destination_exists {
        return Ok(Operation::Payment {
            destination: destination.to_string(),
            asset: crate::transaction::Asset::Native,
            amount: amount.to_string(),
        });
    }

    let value: f64 = amount
        .parse()
        .map_err(|_| PaymentError::InvalidAmount(amount.to_string()))?;

    if value < ACCOUNT_CREATION_MINIMUM_XLM {
        return Err(PaymentError::AccountCreationMinimum);
    }

    Ok(Operation::CreateAccount {
        destination: destination.to_string(),
        starting_balance: amount.to_string(),
    })
}
