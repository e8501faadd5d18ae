// ============================================================================
// LUMEN-BRIDGE - Wallet Session
// ============================================================================
// One external-signer connection and the account state that depends on it.
//
// State machine: Disconnected --connect()--> Connected --disconnect()-->
// Disconnected. A failed connect leaves the session Disconnected. Every
// operation reports a StatusMessage; nothing propagates as an error.
// ============================================================================

use crate::client::{LedgerClient, PaymentRequest, TransactionSummary, DEFAULT_TRANSACTION_LIMIT};
use crate::signer::{ConnectCapabilities, WalletSigner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// SESSION TYPES
// ============================================================================

/// Connection state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionState {
    pub connected: bool,
    pub public_key: Option<String>,
    pub wallet_type: String,
}

impl ConnectionState {
    fn disconnected(wallet_type: &str) -> Self {
        Self {
            connected: false,
            public_key: None,
            wallet_type: wallet_type.to_string(),
        }
    }
}

/// Account data displayed while connected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    /// Formatted native balance, or an error text when the load failed
    pub balance: String,
    pub transactions: Vec<TransactionSummary>,
}

/// Severity of a user-visible status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Short user-visible status string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// Whether this message reports a failure
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

// ============================================================================
// WALLET SESSION
// ============================================================================

/// One wallet connection and its dependent account view
pub struct WalletSession {
    client: LedgerClient,
    signer: Arc<dyn WalletSigner>,
    state: ConnectionState,
    view: Option<AccountView>,
}

impl WalletSession {
    /// Create a disconnected session
    pub fn new(client: LedgerClient, signer: Arc<dyn WalletSigner>) -> Self {
        let state = ConnectionState::disconnected(signer.wallet_type());
        Self {
            client,
            signer,
            state,
            view: None,
        }
    }

    /// Current connection state
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Whether a wallet is connected
    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    /// Account data for the connected wallet, if loaded
    pub fn account_view(&self) -> Option<&AccountView> {
        self.view.as_ref()
    }

    /// Ledger client backing this session
    pub fn client(&self) -> &LedgerClient {
        &self.client
    }

    // ==================== Connection ====================

    /// Connect to the external wallet.
    ///
    /// On success the session becomes Connected and the account view is
    /// refreshed. Any failure leaves the session Disconnected.
    pub async fn connect(&mut self) -> StatusMessage {
        if !self.signer.is_available() {
            return StatusMessage::error(
                "Wallet not detected. Please install the wallet extension",
            );
        }

        if let Err(e) = self.signer.connect(ConnectCapabilities::default()).await {
            warn!("Wallet connection failed: {}", e);
            return StatusMessage::error(format!("Connection failed: {}", e));
        }

        let public_key = match self.signer.public_key().await {
            Ok(key) => key,
            Err(e) => {
                warn!("Failed to get public key: {}", e);
                return StatusMessage::error(format!("Connection failed: {}", e));
            }
        };

        info!("Wallet connected: {}", public_key);
        self.state.connected = true;
        self.state.public_key = Some(public_key);

        self.refresh().await;

        StatusMessage::success("Wallet connected")
    }

    /// Disconnect the wallet. A no-op when already disconnected.
    pub fn disconnect(&mut self) -> StatusMessage {
        self.state.connected = false;
        self.state.public_key = None;
        self.view = None;

        StatusMessage::info("Wallet disconnected")
    }

    // ==================== Dependent Refresh ====================

    /// Reload balance and recent transactions for the connected account.
    ///
    /// Best-effort: a failed balance load degrades to an error text in the
    /// view, and the transaction listing already degrades to empty.
    pub async fn refresh(&mut self) {
        let public_key = match &self.state.public_key {
            Some(key) => key.clone(),
            None => return,
        };

        let balance = match self.client.get_account_balance(&public_key).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!("Failed to load balance: {}", e);
                "Error loading balance".to_string()
            }
        };

        let transactions = self
            .client
            .get_recent_transactions(&public_key, DEFAULT_TRANSACTION_LIMIT)
            .await;

        self.view = Some(AccountView {
            balance,
            transactions,
        });
    }

    // ==================== Payment Submission ====================

    /// Submit a payment from the connected account.
    ///
    /// Guarded on connection state and non-empty fields; delegates to the
    /// ledger client and refreshes the account view on success.
    pub async fn submit_payment(
        &mut self,
        destination: &str,
        amount: &str,
        memo: Option<&str>,
    ) -> StatusMessage {
        let source = match (self.state.connected, &self.state.public_key) {
            (true, Some(key)) => key.clone(),
            _ => return StatusMessage::error("Please connect your wallet first"),
        };

        let destination = destination.trim();
        let amount = amount.trim();
        if destination.is_empty() || amount.is_empty() {
            return StatusMessage::error("Please fill in all required fields");
        }

        let request = PaymentRequest {
            source,
            destination: destination.to_string(),
            amount: amount.to_string(),
            memo: memo.map(str::trim).filter(|m| !m.is_empty()).map(String::from),
        };

        let result = self.client.send_payment(request).await;

        if result.success {
            self.refresh().await;
            StatusMessage::success("Payment sent successfully")
        } else {
            StatusMessage::error(format!(
                "Payment failed: {}",
                result.error.unwrap_or_else(|| "Unknown error".to_string())
            ))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
