// ============================================================================
// LUMEN-BRIDGE - Horizon API Client
// ============================================================================
// HTTP client for Stellar's Horizon API: account queries, transaction
// listing, fee stats, asset listing, submission, and friendbot funding.
// ============================================================================

use crate::config::StellarConfig;
use crate::error::PaymentError;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// DATA TYPES
// ============================================================================

/// Account balance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Asset type: "native" for XLM, "credit_alphanum4" or "credit_alphanum12" for tokens
    pub asset_type: String,

    /// Asset code (empty for native XLM)
    #[serde(default)]
    pub asset_code: String,

    /// Asset issuer (empty for native XLM)
    #[serde(default)]
    pub asset_issuer: String,

    /// Balance amount as string (Stellar uses string for precision)
    pub balance: String,

    /// Trustline limit (for non-native assets)
    #[serde(default)]
    pub limit: Option<String>,
}

impl Balance {
    /// Check if this is native XLM
    pub fn is_native(&self) -> bool {
        self.asset_type == "native"
    }

    /// Get balance as f64
    pub fn amount(&self) -> f64 {
        self.balance.parse().unwrap_or(0.0)
    }

    /// Check if this matches a specific asset
    pub fn matches_asset(&self, code: &str, issuer: &str) -> bool {
        self.asset_code == code && self.asset_issuer == issuer
    }
}

/// Stellar account information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account public key (G... address)
    pub id: String,

    /// Current sequence number
    pub sequence: String,

    /// Account balances
    pub balances: Vec<Balance>,

    /// Account signers
    #[serde(default)]
    pub signers: Vec<AccountSigner>,

    /// Account thresholds
    #[serde(default)]
    pub thresholds: AccountThresholds,

    /// Account flags
    #[serde(default)]
    pub flags: AccountFlags,

    /// Home domain (optional)
    #[serde(default)]
    pub home_domain: Option<String>,
}

impl AccountInfo {
    /// Get native XLM balance, if the account holds one
    pub fn native_balance(&self) -> Option<f64> {
        self.balances.iter().find(|b| b.is_native()).map(|b| b.amount())
    }

    /// Check if account has a trustline for an asset
    pub fn has_trustline(&self, code: &str, issuer: &str) -> bool {
        self.balances.iter().any(|b| b.matches_asset(code, issuer))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSigner {
    pub key: String,
    pub weight: u32,
    #[serde(rename = "type")]
    pub signer_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountThresholds {
    pub low_threshold: u8,
    pub med_threshold: u8,
    pub high_threshold: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFlags {
    pub auth_required: bool,
    pub auth_revocable: bool,
    pub auth_immutable: bool,
    #[serde(default)]
    pub auth_clawback_enabled: bool,
}

/// One transaction as listed by Horizon for an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub successful: bool,
}

/// One issued asset as listed by Horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub asset_code: String,
    #[serde(default)]
    pub asset_issuer: String,
    pub amount: String,
    pub num_accounts: u32,
}

/// Transaction submission result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub hash: String,
    pub ledger: u64,
    pub successful: bool,
}

/// Relevant subset of Horizon fee stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStats {
    pub last_ledger: String,
    pub last_ledger_base_fee: String,
    pub ledger_capacity_usage: String,
}

/// Horizon error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonErrorResponse {
    pub title: Option<String>,
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub extras: Option<HorizonErrorExtras>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonErrorExtras {
    pub result_codes: Option<ResultCodes>,
    pub result_xdr: Option<String>,
}

/// Structured result codes of a rejected transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultCodes {
    pub transaction: Option<String>,
    pub operations: Option<Vec<String>>,
}

impl ResultCodes {
    /// Decode into a human-readable message
    pub fn describe(&self) -> String {
        let mut message = format!(
            "Transaction failed: {}",
            self.transaction.as_deref().unwrap_or("unknown")
        );
        if let Some(ops) = &self.operations {
            if !ops.is_empty() {
                message.push_str(&format!(" - {}", ops.join(", ")));
            }
        }
        message
    }
}

// ============================================================================
// LEDGER API CONTRACT
// ============================================================================

/// Capability contract for the remote ledger query/submission API.
///
/// `HorizonClient` is the production implementation; tests substitute an
/// in-memory double.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Check if an account exists on the ledger
    async fn account_exists(&self, address: &str) -> Result<bool>;

    /// Load full account information
    async fn load_account(&self, address: &str) -> Result<AccountInfo>;

    /// List the most recent transactions for an account, newest first
    async fn list_transactions(&self, address: &str, limit: u32) -> Result<Vec<TransactionRecord>>;

    /// Fetch the current network base fee in stroops
    async fn fetch_base_fee(&self) -> Result<u32>;

    /// Submit a signed transaction envelope (base64 XDR)
    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<TransactionResponse>;

    /// List known issued assets
    async fn list_assets(&self, limit: u32) -> Result<Vec<AssetRecord>>;

    /// Fund an account via the testnet faucet
    async fn friendbot_fund(&self, address: &str) -> Result<()>;
}

// ============================================================================
// HORIZON CLIENT
// ============================================================================

/// Client for Stellar Horizon API
pub struct HorizonClient {
    config: StellarConfig,
    http: Client,
}

impl HorizonClient {
    /// Create new Horizon client
    pub fn new(config: StellarConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Create client for testnet
    pub fn testnet() -> Result<Self> {
        Self::new(StellarConfig::testnet())
    }

    /// Create client for the public network
    pub fn pubnet() -> Result<Self> {
        Self::new(StellarConfig::pubnet())
    }

    /// Get configuration
    pub fn config(&self) -> &StellarConfig {
        &self.config
    }

    fn unexpected_status(status: u16, body: String) -> PaymentError {
        PaymentError::HorizonError(format!("HTTP {}: {}", status, body))
    }
}

#[async_trait]
impl LedgerApi for HorizonClient {
    async fn account_exists(&self, address: &str) -> Result<bool> {
        let url = format!("{}/accounts/{}", self.config.horizon_url, address);

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            429 => Err(PaymentError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Self::unexpected_status(status, error_text))
            }
        }
    }

    async fn load_account(&self, address: &str) -> Result<AccountInfo> {
        let url = format!("{}/accounts/{}", self.config.horizon_url, address);

        debug!("Loading account: {}", address);

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                let account: AccountInfo = response.json().await?;
                Ok(account)
            }
            404 => Err(PaymentError::AccountNotFound(address.to_string())),
            429 => Err(PaymentError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Self::unexpected_status(status, error_text))
            }
        }
    }

    async fn list_transactions(&self, address: &str, limit: u32) -> Result<Vec<TransactionRecord>> {
        let url = format!(
            "{}/accounts/{}/transactions?order=desc&limit={}",
            self.config.horizon_url, address, limit
        );

        debug!("Listing transactions for: {}", address);

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                let data: serde_json::Value = response.json().await?;
                let records = data["_embedded"]["records"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default();

                let transactions: Vec<TransactionRecord> = records
                    .into_iter()
                    .filter_map(|r| serde_json::from_value(r).ok())
                    .collect();

                Ok(transactions)
            }
            404 => Err(PaymentError::AccountNotFound(address.to_string())),
            429 => Err(PaymentError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Self::unexpected_status(status, error_text))
            }
        }
    }

    async fn fetch_base_fee(&self) -> Result<u32> {
        let url = format!("{}/fee_stats", self.config.horizon_url);

        let response = self.http.get(&url).send().await?;
        let stats: FeeStats = response.json().await?;

        stats
            .last_ledger_base_fee
            .parse()
            .map_err(|_| PaymentError::HorizonError("Invalid base fee in fee stats".to_string()))
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<TransactionResponse> {
        let url = format!("{}/transactions", self.config.horizon_url);

        debug!("Submitting transaction...");

        let response = self
            .http
            .post(&url)
            .form(&[("tx", envelope_xdr)])
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {
                let tx_response: TransactionResponse = response.json().await?;
                debug!("Transaction successful: {}", tx_response.hash);
                Ok(tx_response)
            }
            400 => {
                let error: HorizonErrorResponse = response.json().await?;
                let reason = error
                    .extras
                    .and_then(|e| e.result_codes)
                    .map(|rc| rc.describe())
                    .unwrap_or_else(|| error.detail.unwrap_or_default());

                warn!("Transaction rejected: {}", reason);
                Err(PaymentError::TransactionRejected { reason })
            }
            429 => Err(PaymentError::RateLimited),
            504 => Err(PaymentError::TransactionTimeout),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Self::unexpected_status(status, error_text))
            }
        }
    }

    async fn list_assets(&self, limit: u32) -> Result<Vec<AssetRecord>> {
        let url = format!("{}/assets?limit={}", self.config.horizon_url, limit);

        debug!("Listing assets");

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                let data: serde_json::Value = response.json().await?;
                let records = data["_embedded"]["records"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default();

                let assets: Vec<AssetRecord> = records
                    .into_iter()
                    .filter_map(|r| serde_json::from_value(r).ok())
                    .collect();

                Ok(assets)
            }
            429 => Err(PaymentError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Self::unexpected_status(status, error_text))
            }
        }
    }

    async fn friendbot_fund(&self, address: &str) -> Result<()> {
        let friendbot_url = self.config.friendbot_url().ok_or_else(|| {
            PaymentError::ConfigError("Friendbot only available on testnet".to_string())
        })?;

        let url = format!("{}?addr={}", friendbot_url, address);

        debug!("Requesting friendbot funding for: {}", address);

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                debug!("Friendbot funded account: {}", address);
                Ok(())
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PaymentError::HorizonError(format!(
                    "Friendbot HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }
}
