// ============================================================================
// LUMEN-BRIDGE - Stellar Wallet Integration
// ============================================================================
// Integration layer between a UI and (a) the Stellar Horizon API and (b) an
// external signing wallet.
//
// Features:
// - Query account balances, transactions, and issued assets
// - Build and submit payments, account creation, and trustlines
// - Delegate signing to a pluggable wallet (WalletSigner contract)
// - Track one wallet connection per session (WalletSession)
// - Testnet friendbot funding
// ============================================================================

pub mod amount;
pub mod client;
pub mod config;
pub mod error;
pub mod horizon;
pub mod session;
pub mod signer;
pub mod strkey;
pub mod transaction;

pub use amount::{format_address, format_amount, stroops_to_xlm, validate_amount, xlm_to_stroops};
pub use client::{
    AssetSummary, LedgerClient, PaymentRequest, PaymentResult, TransactionSummary,
    ACCOUNT_NOT_FOUND,
};
pub use config::{Network, StellarConfig};
pub use error::PaymentError;
pub use horizon::{AccountInfo, Balance, HorizonClient, LedgerApi, TransactionResponse};
pub use session::{AccountView, ConnectionState, StatusKind, StatusMessage, WalletSession};
pub use signer::{ConnectCapabilities, LocalSigner, SigningRequest, WalletSigner};
pub use strkey::{decode_public_key, encode_public_key, is_valid_address};
pub use transaction::{Asset, Memo, Operation, SignedEnvelope, TransactionBuilder};

/// Re-export for convenience
pub type Result<T> = std::result::Result<T, PaymentError>;
