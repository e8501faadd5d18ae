//! In-memory ledger double.
//!
//! Implements the `LedgerApi` capability contract over a seeded account map,
//! records every submitted envelope, and can be switched into failure modes.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use lumen_bridge::horizon::{
    AccountInfo, AssetRecord, LedgerApi, TransactionRecord, TransactionResponse,
};
use lumen_bridge::{Balance, PaymentError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct MockLedger {
    accounts: Mutex<HashMap<String, AccountInfo>>,
    transactions: Mutex<HashMap<String, Vec<TransactionRecord>>>,
    assets: Mutex<Vec<AssetRecord>>,
    base_fee: u32,

    /// Every envelope passed to submit_transaction, in order
    pub submissions: Mutex<Vec<String>>,

    /// When set, listing endpoints fail
    pub fail_listings: AtomicBool,

    /// When set, submissions are rejected with this reason
    pub reject_reason: Mutex<Option<String>>,

    /// Whether friendbot funding succeeds
    pub faucet_works: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            assets: Mutex::new(Vec::new()),
            base_fee: 100,
            submissions: Mutex::new(Vec::new()),
            fail_listings: AtomicBool::new(false),
            reject_reason: Mutex::new(None),
            faucet_works: AtomicBool::new(true),
        }
    }

    /// Seed an account with a native balance
    pub fn seed_account(&self, address: &str, balance: &str, sequence: u64) {
        let account = AccountInfo {
            id: address.to_string(),
            sequence: sequence.to_string(),
            balances: vec![Balance {
                asset_type: "native".to_string(),
                asset_code: String::new(),
                asset_issuer: String::new(),
                balance: balance.to_string(),
                limit: None,
            }],
            signers: vec![],
            thresholds: Default::default(),
            flags: Default::default(),
            home_domain: None,
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(address.to_string(), account);
    }

    /// Seed `count` historical transactions for an account, newest first
    pub fn seed_transactions(&self, address: &str, count: usize) {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let records: Vec<TransactionRecord> = (0..count)
            .map(|i| TransactionRecord {
                hash: format!("{:064x}", i),
                created_at: base - Duration::minutes(i as i64),
                successful: true,
            })
            .collect();
        self.transactions
            .lock()
            .unwrap()
            .insert(address.to_string(), records);
    }

    /// Seed `count` issued assets
    pub fn seed_assets(&self, count: usize) {
        let mut assets = self.assets.lock().unwrap();
        *assets = (0..count)
            .map(|i| AssetRecord {
                asset_code: format!("AST{}", i),
                asset_issuer: format!("GISSUER{}", i),
                amount: "1000.0".to_string(),
                num_accounts: 10 + i as u32,
            })
            .collect();
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerApi for MockLedger {
    async fn account_exists(&self, address: &str) -> Result<bool> {
        Ok(self.accounts.lock().unwrap().contains_key(address))
    }

    async fn load_account(&self, address: &str) -> Result<AccountInfo> {
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| PaymentError::AccountNotFound(address.to_string()))
    }

    async fn list_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>> {
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(PaymentError::HorizonError("listing unavailable".to_string()));
        }

        let transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .get(address)
            .map(|records| records.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_base_fee(&self) -> Result<u32> {
        Ok(self.base_fee)
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<TransactionResponse> {
        if let Some(reason) = self.reject_reason.lock().unwrap().clone() {
            return Err(PaymentError::TransactionRejected { reason });
        }

        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(envelope_xdr.to_string());

        Ok(TransactionResponse {
            hash: format!("{:064x}", submissions.len()),
            ledger: 12345,
            successful: true,
        })
    }

    async fn list_assets(&self, _limit: u32) -> Result<Vec<AssetRecord>> {
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(PaymentError::HorizonError("listing unavailable".to_string()));
        }

        // Deliberately ignores the limit so callers must cap the result
        Ok(self.assets.lock().unwrap().clone())
    }

    async fn friendbot_fund(&self, address: &str) -> Result<()> {
        if self.faucet_works.load(Ordering::SeqCst) {
            self.seed_account(address, "10000.0", 1);
            Ok(())
        } else {
            Err(PaymentError::HorizonError("Friendbot HTTP 500".to_string()))
        }
    }
}
