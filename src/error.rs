// ============================================================================
// LUMEN-BRIDGE - Error Types
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    // ==================== Address / Key Errors ====================
    #[error("Invalid Stellar address: {0}")]
    InvalidStellarAddress(String),

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Key conversion failed: {0}")]
    KeyConversionError(String),

    // ==================== Account Errors ====================
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // ==================== Validation Errors ====================
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Minimum 1 XLM required to create new account")]
    AccountCreationMinimum,

    // ==================== Transaction Errors ====================
    #[error("Transaction rejected: {reason}")]
    TransactionRejected { reason: String },

    #[error("Transaction timeout")]
    TransactionTimeout,

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Signing failed: {0}")]
    SigningError(String),

    // ==================== Signer Errors ====================
    #[error("Wallet not detected. Please install the wallet extension")]
    SignerUnavailable,

    #[error("Connection rejected by user")]
    ConnectionRejected,

    // ==================== Network Errors ====================
    #[error("Horizon API error: {0}")]
    HorizonError(String),

    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    // ==================== Configuration Errors ====================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ==================== Internal Errors ====================
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::SerializationError(err.to_string())
    }
}
