// ============================================================================
// LUMEN-BRIDGE - Configuration
// ============================================================================
// Network configuration for Stellar testnet and the public network.
// Switching networks is a whole-client reconfiguration, not a per-call flag.

use serde::{Deserialize, Serialize};

/// Network selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Testnet,
    Pubnet,
}

impl Default for Network {
    fn default() -> Self {
        Network::Testnet
    }
}

/// Stellar network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StellarConfig {
    /// Network (testnet or public network)
    pub network: Network,

    /// Horizon API URL
    pub horizon_url: String,

    /// Network passphrase for transaction signing
    pub network_passphrase: String,

    /// Fallback base fee in stroops (1 XLM = 10,000,000 stroops)
    pub base_fee: u32,
}

impl StellarConfig {
    /// Create testnet configuration
    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            horizon_url: "https://horizon-testnet.stellar.org".to_string(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            base_fee: 100,
        }
    }

    /// Create public network configuration
    pub fn pubnet() -> Self {
        Self {
            network: Network::Pubnet,
            horizon_url: "https://horizon.stellar.org".to_string(),
            network_passphrase: "Public Global Stellar Network ; September 2015".to_string(),
            base_fee: 100,
        }
    }

    /// Get friendbot URL (testnet only)
    pub fn friendbot_url(&self) -> Option<&str> {
        match self.network {
            Network::Testnet => Some("https://friendbot.stellar.org"),
            Network::Pubnet => None,
        }
    }

    /// Check if this is the public network
    pub fn is_pubnet(&self) -> bool {
        self.network == Network::Pubnet
    }

    /// Get Stellar Expert explorer URL for an address
    pub fn explorer_account_url(&self, address: &str) -> String {
        match self.network {
            Network::Pubnet => format!("https://stellar.expert/explorer/public/account/{}", address),
            Network::Testnet => format!("https://stellar.expert/explorer/testnet/account/{}", address),
        }
    }

    /// Get Stellar Expert explorer URL for a transaction
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        match self.network {
            Network::Pubnet => format!("https://stellar.expert/explorer/public/tx/{}", hash),
            Network::Testnet => format!("https://stellar.expert/explorer/testnet/tx/{}", hash),
        }
    }
}

impl Default for StellarConfig {
    fn default() -> Self {
        Self::testnet()
    }
}
