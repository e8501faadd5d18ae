// ============================================================================
// LUMEN-BRIDGE - Transaction Builder
// ============================================================================
// Build Stellar transactions for payments, account creation, and trustlines.
//
// Stellar transactions consist of:
// - Source account
// - Sequence number (incremented each transaction)
// - Fee
// - Time bounds
// - Memo (optional)
// - Operations
// - Signatures
//
// The builder produces an unsigned envelope (zero signatures) which is handed
// to a WalletSigner; the signer returns a signed envelope ready to submit.
// ============================================================================

use crate::amount::xlm_to_stroops;
use crate::config::StellarConfig;
use crate::error::PaymentError;
use crate::horizon::AccountInfo;
use crate::strkey::decode_public_key;
use crate::Result;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Keypair, Signer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// ENVELOPE_TYPE_TX discriminant
const ENVELOPE_TYPE_TX: [u8; 4] = [0, 0, 0, 2];

/// Ledger-side validity window for built transactions
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Maximum trustline limit (max int64 in 7-decimal units)
const MAX_TRUST_LIMIT: &str = "922337203685.4775807";

/// MEMO_TEXT is capped at 28 bytes on the ledger
const MEMO_TEXT_MAX_BYTES: usize = 28;

// ============================================================================
// TRANSACTION TYPES
// ============================================================================

/// Transaction operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new account with starting balance
    CreateAccount {
        destination: String,
        starting_balance: String,
    },

    /// Payment of native XLM or an issued asset
    Payment {
        destination: String,
        asset: Asset,
        amount: String,
    },

    /// Create or modify a trustline
    ChangeTrust {
        asset: Asset,
        limit: Option<String>,
    },
}

/// Stellar asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Asset {
    Native,
    CreditAlphaNum4 { code: String, issuer: String },
    CreditAlphaNum12 { code: String, issuer: String },
}

impl Asset {
    /// Create native XLM asset
    pub fn native() -> Self {
        Asset::Native
    }

    /// Create issued asset (code length picks the alphanum variant)
    pub fn credit(code: &str, issuer: &str) -> Self {
        if code.len() <= 4 {
            Asset::CreditAlphaNum4 {
                code: code.to_string(),
                issuer: issuer.to_string(),
            }
        } else {
            Asset::CreditAlphaNum12 {
                code: code.to_string(),
                issuer: issuer.to_string(),
            }
        }
    }

    /// Check if native
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

/// Transaction memo
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum Memo {
    #[default]
    None,
    Text(String),
}

/// Opaque signed transaction envelope, base64 XDR. Used exactly once.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    envelope_xdr: String,
}

impl SignedEnvelope {
    /// Deserialize a signed envelope returned by a signer.
    ///
    /// Validates the base64 encoding and the envelope type discriminant;
    /// the ledger does full validation on submit.
    pub fn from_xdr(envelope_xdr: &str) -> Result<Self> {
        let bytes = general_purpose::STANDARD
            .decode(envelope_xdr)
            .map_err(|e| PaymentError::InvalidEnvelope(format!("Invalid base64: {}", e)))?;

        if bytes.len() < 8 || bytes[0..4] != ENVELOPE_TYPE_TX {
            return Err(PaymentError::InvalidEnvelope(
                "Not a transaction envelope".to_string(),
            ));
        }

        Ok(Self {
            envelope_xdr: envelope_xdr.to_string(),
        })
    }

    /// Base64 XDR for submission
    pub fn as_xdr(&self) -> &str {
        &self.envelope_xdr
    }
}

// ============================================================================
// TRANSACTION BUILDER
// ============================================================================

/// Builder for Stellar transactions
pub struct TransactionBuilder {
    network_passphrase: String,
    source_account: String,
    sequence: u64,
    fee: u32,
    operations: Vec<Operation>,
    memo: Memo,
    timeout_seconds: u64,
}

impl TransactionBuilder {
    /// Create new transaction builder from a freshly loaded source account
    pub fn new(config: &StellarConfig, source_account: &AccountInfo) -> Self {
        Self {
            network_passphrase: config.network_passphrase.clone(),
            source_account: source_account.id.clone(),
            sequence: source_account.sequence.parse::<u64>().unwrap_or(0) + 1,
            fee: config.base_fee,
            operations: Vec::new(),
            memo: Memo::None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Set fee per operation (in stroops)
    pub fn fee(mut self, fee: u32) -> Self {
        self.fee = fee;
        self
    }

    /// Set text memo
    pub fn memo_text(mut self, text: &str) -> Self {
        self.memo = Memo::Text(text.to_string());
        self
    }

    /// Set validity timeout
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Add operation
    pub fn add_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Add create account operation
    pub fn create_account(self, destination: &str, starting_balance: &str) -> Self {
        self.add_operation(Operation::CreateAccount {
            destination: destination.to_string(),
            starting_balance: starting_balance.to_string(),
        })
    }

    /// Add XLM payment operation
    pub fn payment_xlm(self, destination: &str, amount: &str) -> Self {
        self.add_operation(Operation::Payment {
            destination: destination.to_string(),
            asset: Asset::Native,
            amount: amount.to_string(),
        })
    }

    /// Add change trust operation (create trustline)
    pub fn change_trust(self, asset_code: &str, asset_issuer: &str, limit: Option<&str>) -> Self {
        self.add_operation(Operation::ChangeTrust {
            asset: Asset::credit(asset_code, asset_issuer),
            limit: limit.map(|s| s.to_string()),
        })
    }

    /// Build the unsigned transaction
    pub fn build(self) -> Result<UnsignedTransaction> {
        if self.operations.is_empty() {
            return Err(PaymentError::InvalidTransaction(
                "Transaction must have at least one operation".to_string(),
            ));
        }

        if let Memo::Text(text) = &self.memo {
            if text.len() > MEMO_TEXT_MAX_BYTES {
                return Err(PaymentError::InvalidTransaction(format!(
                    "Memo text exceeds {} bytes",
                    MEMO_TEXT_MAX_BYTES
                )));
            }
        }

        // Total fee is per operation
        let total_fee = self.fee * self.operations.len() as u32;

        let max_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| PaymentError::InvalidTransaction(e.to_string()))?
            .as_secs()
            + self.timeout_seconds;

        Ok(UnsignedTransaction {
            network_passphrase: self.network_passphrase,
            source_account: self.source_account,
            sequence: self.sequence,
            fee: total_fee,
            min_time: 0,
            max_time,
            operations: self.operations,
            memo: self.memo,
        })
    }
}

// ============================================================================
// UNSIGNED TRANSACTION
// ============================================================================

/// Unsigned transaction ready for an external signer
pub struct UnsignedTransaction {
    network_passphrase: String,
    source_account: String,
    sequence: u64,
    fee: u32,
    min_time: u64,
    max_time: u64,
    operations: Vec<Operation>,
    memo: Memo,
}

impl UnsignedTransaction {
    /// Network passphrase the transaction was built for
    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    /// Serialize as a base64 envelope with zero signatures.
    ///
    /// This is the form handed to a `WalletSigner`.
    pub fn envelope_xdr(&self) -> Result<String> {
        let tx_xdr = self.to_xdr()?;

        let mut envelope = Vec::with_capacity(tx_xdr.len() + 8);
        envelope.extend_from_slice(&ENVELOPE_TYPE_TX);
        envelope.extend_from_slice(&tx_xdr);
        // Empty signatures array
        envelope.extend_from_slice(&[0, 0, 0, 0]);

        Ok(general_purpose::STANDARD.encode(envelope))
    }

    /// Build transaction XDR (without envelope)
    fn to_xdr(&self) -> Result<Vec<u8>> {
        let mut xdr = Vec::new();

        // Source account (MuxedAccount)
        write_muxed_account(&mut xdr, &self.source_account)?;

        // Fee
        xdr.extend_from_slice(&self.fee.to_be_bytes());

        // Sequence number
        xdr.extend_from_slice(&self.sequence.to_be_bytes());

        // Preconditions: PRECOND_TIME = 1, then TimeBounds
        xdr.extend_from_slice(&[0, 0, 0, 1]);
        xdr.extend_from_slice(&self.min_time.to_be_bytes());
        xdr.extend_from_slice(&self.max_time.to_be_bytes());

        // Memo
        self.write_memo(&mut xdr);

        // Operations array
        xdr.extend_from_slice(&(self.operations.len() as u32).to_be_bytes());
        for op in &self.operations {
            write_operation(&mut xdr, op)?;
        }

        // Ext (reserved)
        xdr.extend_from_slice(&[0, 0, 0, 0]);

        Ok(xdr)
    }

    fn write_memo(&self, xdr: &mut Vec<u8>) {
        match &self.memo {
            Memo::None => {
                // MEMO_NONE = 0
                xdr.extend_from_slice(&[0, 0, 0, 0]);
            }
            Memo::Text(text) => {
                // MEMO_TEXT = 1, string with length prefix, 4-byte padded
                xdr.extend_from_slice(&[0, 0, 0, 1]);
                let bytes = text.as_bytes();
                xdr.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                xdr.extend_from_slice(bytes);
                let padding = (4 - (bytes.len() % 4)) % 4;
                for _ in 0..padding {
                    xdr.push(0);
                }
            }
        }
    }
}

fn write_muxed_account(xdr: &mut Vec<u8>, address: &str) -> Result<()> {
    let key_bytes = decode_public_key(address)?;

    // KEY_TYPE_ED25519 = 0
    xdr.extend_from_slice(&[0, 0, 0, 0]);
    xdr.extend_from_slice(&key_bytes);

    Ok(())
}

fn write_account_id(xdr: &mut Vec<u8>, address: &str) -> Result<()> {
    let key_bytes = decode_public_key(address)?;
    // PUBLIC_KEY_TYPE_ED25519 = 0
    xdr.extend_from_slice(&[0, 0, 0, 0]);
    xdr.extend_from_slice(&key_bytes);
    Ok(())
}

fn write_operation(xdr: &mut Vec<u8>, op: &Operation) -> Result<()> {
    // No per-operation source account override
    xdr.extend_from_slice(&[0, 0, 0, 0]);

    match op {
        Operation::CreateAccount {
            destination,
            starting_balance,
        } => {
            // CREATE_ACCOUNT = 0
            xdr.extend_from_slice(&[0, 0, 0, 0]);
            write_account_id(xdr, destination)?;
            write_amount(xdr, starting_balance)?;
        }

        Operation::Payment {
            destination,
            asset,
            amount,
        } => {
            // PAYMENT = 1
            xdr.extend_from_slice(&[0, 0, 0, 1]);
            write_muxed_account(xdr, destination)?;
            write_asset(xdr, asset)?;
            write_amount(xdr, amount)?;
        }

        Operation::ChangeTrust { asset, limit } => {
            // CHANGE_TRUST = 6
            xdr.extend_from_slice(&[0, 0, 0, 6]);
            write_asset(xdr, asset)?;
            let limit_value = limit.as_deref().unwrap_or(MAX_TRUST_LIMIT);
            write_amount(xdr, limit_value)?;
        }
    }

    Ok(())
}

fn write_asset(xdr: &mut Vec<u8>, asset: &Asset) -> Result<()> {
    match asset {
        Asset::Native => {
            // ASSET_TYPE_NATIVE = 0
            xdr.extend_from_slice(&[0, 0, 0, 0]);
        }
        Asset::CreditAlphaNum4 { code, issuer } => {
            // ASSET_TYPE_CREDIT_ALPHANUM4 = 1
            xdr.extend_from_slice(&[0, 0, 0, 1]);
            write_asset_code(xdr, code, 4)?;
            write_account_id(xdr, issuer)?;
        }
        Asset::CreditAlphaNum12 { code, issuer } => {
            // ASSET_TYPE_CREDIT_ALPHANUM12 = 2
            xdr.extend_from_slice(&[0, 0, 0, 2]);
            write_asset_code(xdr, code, 12)?;
            write_account_id(xdr, issuer)?;
        }
    }
    Ok(())
}

fn write_asset_code(xdr: &mut Vec<u8>, code: &str, width: usize) -> Result<()> {
    let code_slice = code.as_bytes();
    if code_slice.is_empty() || code_slice.len() > width {
        return Err(PaymentError::InvalidTransaction(format!(
            "Asset code must be 1-{} characters: {}",
            width, code
        )));
    }

    let mut code_bytes = vec![0u8; width];
    code_bytes[..code_slice.len()].copy_from_slice(code_slice);
    xdr.extend_from_slice(&code_bytes);
    Ok(())
}

fn write_amount(xdr: &mut Vec<u8>, amount: &str) -> Result<()> {
    let parsed: f64 = amount
        .parse()
        .map_err(|_| PaymentError::InvalidTransaction(format!("Invalid amount: {}", amount)))?;
    let stroops = xlm_to_stroops(parsed);
    xdr.extend_from_slice(&stroops.to_be_bytes());
    Ok(())
}

// ============================================================================
// ENVELOPE SIGNING
// ============================================================================

/// Sign an unsigned base64 envelope with an Ed25519 keypair.
///
/// The signature payload is sha256(network_id || ENVELOPE_TYPE_TX || tx),
/// where network_id = sha256(network_passphrase). Returns the envelope with
/// one decorated signature attached.
pub fn sign_envelope(
    envelope_xdr: &str,
    network_passphrase: &str,
    keypair: &Keypair,
) -> Result<String> {
    let bytes = general_purpose::STANDARD
        .decode(envelope_xdr)
        .map_err(|e| PaymentError::InvalidEnvelope(format!("Invalid base64: {}", e)))?;

    if bytes.len() < 8 || bytes[0..4] != ENVELOPE_TYPE_TX {
        return Err(PaymentError::InvalidEnvelope(
            "Not a transaction envelope".to_string(),
        ));
    }

    // Unsigned envelopes end with an empty signatures array
    if bytes[bytes.len() - 4..] != [0, 0, 0, 0] {
        return Err(PaymentError::InvalidEnvelope(
            "Envelope already carries signatures".to_string(),
        ));
    }

    let tx_xdr = &bytes[4..bytes.len() - 4];

    let network_id = Sha256::digest(network_passphrase.as_bytes());

    let mut payload = Vec::with_capacity(network_id.len() + 4 + tx_xdr.len());
    payload.extend_from_slice(&network_id);
    payload.extend_from_slice(&ENVELOPE_TYPE_TX);
    payload.extend_from_slice(tx_xdr);

    let tx_hash = Sha256::digest(&payload);
    let signature = keypair.sign(&tx_hash);
    let signature_bytes = signature.to_bytes();
    let public_key_bytes = keypair.public.as_bytes();

    let mut envelope = Vec::with_capacity(bytes.len() + 4 + 4 + signature_bytes.len());
    envelope.extend_from_slice(&ENVELOPE_TYPE_TX);
    envelope.extend_from_slice(tx_xdr);

    // Signatures array: one DecoratedSignature
    envelope.extend_from_slice(&[0, 0, 0, 1]);
    // Hint: last 4 bytes of the public key
    envelope.extend_from_slice(&public_key_bytes[28..32]);
    // Signature as variable-length opaque (64 bytes, already 4-byte aligned)
    envelope.extend_from_slice(&(signature_bytes.len() as u32).to_be_bytes());
    envelope.extend_from_slice(&signature_bytes);

    Ok(general_purpose::STANDARD.encode(envelope))
}

// ============================================================================
// TESTS
// ============================================================================
