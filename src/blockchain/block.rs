use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// Character a mined hash must start with, repeated `difficulty` times.
pub const POW_CHAR: char = '0';

/// A sealed batch of ledger transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: i64, // Unix epoch millis (UTC)
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub nonce: u64,   // Proof-of-Work nonce
    pub hash: String, // Cached hash of the block
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(Utc::now().timestamp_millis(), Vec::new(), String::from("0"))
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(timestamp: i64, transactions: Vec<Transaction>, previous_hash: String) -> Self {
        let mut block = Self {
            timestamp,
            transactions,
            previous_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 over previous hash, timestamp, the JSON of the transactions
    /// and the nonce (excluding the `hash` field itself).
    pub fn compute_hash(&self) -> String {
        // A serialization failure leaves nothing sound to hash: treat as fatal.
        let txs_json = serde_json::to_string(&self.transactions).expect("serialize txs");
        let preimage = format!(
            "{}{}{}{}",
            self.previous_hash, self.timestamp, txs_json, self.nonce
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Perform Proof-of-Work by finding a nonce that yields a hash
    /// starting with `difficulty` leading zeros (in hex).
    pub fn mine(&mut self, difficulty: u32) {
        loop {
            self.hash = self.compute_hash();
            if meets_difficulty(&self.hash, difficulty) {
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Every contained transaction is independently valid.
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions.iter().all(Transaction::is_valid)
    }

    /// The cached `hash` still matches the block content.
    pub fn has_consistent_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let mut chars = hash.chars();
    (0..difficulty).all(|_| chars.next() == Some(POW_CHAR))
}
