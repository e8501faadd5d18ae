// ============================================================================
// LUMEN-BRIDGE - Wallet Signer Contract
// ============================================================================
// Capability contract for the external signing wallet. The production signer
// is a browser-extension wallet reachable over its own bridge; this crate
// only depends on the contract. LocalSigner is an in-process implementation
// for headless use and tests.
// ============================================================================

use crate::error::PaymentError;
use crate::strkey::encode_public_key;
use crate::transaction::sign_envelope;
use crate::Result;
use async_trait::async_trait;
use ed25519_dalek::{Keypair, PublicKey, SecretKey};
use serde::{Deserialize, Serialize};

/// Capabilities requested when connecting to a wallet
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConnectCapabilities {
    pub can_request_public_key: bool,
    pub can_request_sign: bool,
}

impl Default for ConnectCapabilities {
    fn default() -> Self {
        Self {
            can_request_public_key: true,
            can_request_sign: true,
        }
    }
}

/// Context passed alongside a signing request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRequest {
    /// Network passphrase the transaction was built for
    pub network_passphrase: String,

    /// Public key expected to sign
    pub public_key: String,
}

/// External transaction signer.
///
/// Mirrors the wallet-extension surface: availability probe, connection
/// authorization, public key retrieval, and envelope signing. Implementations
/// must not submit transactions themselves.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Whether the signer is reachable at all
    fn is_available(&self) -> bool;

    /// Short tag identifying the wallet implementation
    fn wallet_type(&self) -> &str {
        "wallet"
    }

    /// Request authorization. Errors with `ConnectionRejected` if the user
    /// declines.
    async fn connect(&self, capabilities: ConnectCapabilities) -> Result<()>;

    /// Public key of the authorized account
    async fn public_key(&self) -> Result<String>;

    /// Sign an unsigned base64 envelope; returns the signed envelope
    async fn sign_transaction(&self, envelope_xdr: &str, request: &SigningRequest)
        -> Result<String>;
}

// ============================================================================
// LOCAL SIGNER
// ============================================================================

/// In-process Ed25519 signer
pub struct LocalSigner {
    keypair: Keypair,
}

impl LocalSigner {
    /// Create from raw Ed25519 secret key bytes
    pub fn from_secret_bytes(secret_bytes: &[u8; 32]) -> Result<Self> {
        let secret =
            SecretKey::from_bytes(secret_bytes).map_err(|_| PaymentError::InvalidSecretKey)?;
        let public = PublicKey::from(&secret);
        Ok(Self {
            keypair: Keypair { secret, public },
        })
    }

    /// Address of the signing account
    pub fn address(&self) -> Result<String> {
        encode_public_key(self.keypair.public.as_bytes())
    }
}

#[async_trait]
impl WalletSigner for LocalSigner {
    fn is_available(&self) -> bool {
        true
    }

    fn wallet_type(&self) -> &str {
        "local"
    }

    async fn connect(&self, _capabilities: ConnectCapabilities) -> Result<()> {
        Ok(())
    }

    async fn public_key(&self) -> Result<String> {
        self.address()
    }

    async fn sign_transaction(
        &self,
        envelope_xdr: &str,
        request: &SigningRequest,
    ) -> Result<String> {
        let address = self.address()?;
        if request.public_key != address {
            return Err(PaymentError::SigningError(format!(
                "Requested key {} does not match signer {}",
                request.public_key, address
            )));
        }

        sign_envelope(envelope_xdr, &request.network_passphrase, &self.keypair)
    }
}
