use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::amount::{Cents, scale, split};

pub const DEFAULT_CARD_BRAND: &str = "ECA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    Payment,
    Credit,
    Debit,
    InstallmentPayment,
    MiningReward,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "TRANSFER",
            Self::Payment => "PAYMENT",
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
            Self::InstallmentPayment => "INSTALLMENT_PAYMENT",
            Self::MiningReward => "MINING_REWARD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A monetary movement recorded on the ledger.
///
/// `from_address == None` marks funds issued by the system itself (initial
/// credit lines, mining rewards). Field order matters: blocks hash the JSON
/// serialization of their transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from_address: Option<String>,
    pub to_address: String,
    pub amount: Cents,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub description: String,
    pub card_brand: String,
    pub timestamp: i64, // Unix epoch millis (UTC)
    pub status: TransactionStatus,
    pub installments: u32,
    pub installment_amount: Cents,
    pub current_installment: u32,
    pub parent_transaction_id: Option<String>,
    pub interest_rate: f64,
    pub due_date: Option<i64>,
}

impl Transaction {
    /// Build a single-installment transaction, stamped with the current time.
    /// Amount checks happen on admission, not here.
    pub fn new(
        from_address: Option<String>,
        to_address: impl Into<String>,
        amount: Cents,
        tx_type: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_address,
            to_address: to_address.into(),
            amount,
            tx_type,
            description: description.into(),
            card_brand: DEFAULT_CARD_BRAND.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            status: TransactionStatus::Pending,
            installments: 1,
            installment_amount: amount,
            current_installment: 1,
            parent_transaction_id: None,
            interest_rate: 0.0,
            due_date: None,
        }
    }

    /// Split the amount across `installments` billing cycles (at least one).
    pub fn with_installments(mut self, installments: u32) -> Self {
        let installments = installments.max(1);
        self.installments = installments;
        self.installment_amount = split(self.amount, installments);
        self
    }

    pub fn with_card_brand(mut self, brand: impl Into<String>) -> Self {
        self.card_brand = brand.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// SHA-256 over (from, to, amount, timestamp, type). Identifies the
    /// transaction's content; blocks hash the full serialized record instead.
    pub fn compute_hash(&self) -> String {
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.from_address.as_deref().unwrap_or("null"),
            self.to_address,
            self.amount,
            self.timestamp,
            self.tx_type.as_str()
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// System-issued funds are always valid; otherwise both parties must be
    /// present and the amount positive.
    pub fn is_valid(&self) -> bool {
        let Some(from) = self.from_address.as_deref() else {
            return true;
        };
        if from.trim().is_empty() || self.to_address.trim().is_empty() {
            return false;
        }
        self.amount > 0
    }

    pub fn is_system_issued(&self) -> bool {
        self.from_address.is_none()
    }

    pub fn involves(&self, address: &str) -> bool {
        self.from_address.as_deref() == Some(address) || self.to_address == address
    }

    pub fn approve(&mut self) {
        self.status = TransactionStatus::Approved;
    }

    pub fn reject(&mut self) {
        self.status = TransactionStatus::Rejected;
    }

    /// Grow the amount by `rate_pct` percent and record the rate.
    ///
    /// NOTE: `installment_amount` keeps the value computed at construction.
    pub fn apply_interest(&mut self, rate_pct: f64) {
        self.amount = scale(self.amount, 1.0 + rate_pct / 100.0);
        self.interest_rate = rate_pct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(from: &str, to: &str, amount: Cents) -> Transaction {
        Transaction::new(
            Some(from.into()),
            to,
            amount,
            TransactionType::Transfer,
            "test",
        )
    }

    #[test]
    fn new_transaction_is_pending_with_single_installment() {
        let tx = transfer("alice", "bob", 1_000);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.installments, 1);
        assert_eq!(tx.installment_amount, 1_000);
        assert_eq!(tx.current_installment, 1);
        assert!(tx.parent_transaction_id.is_none());
        assert_eq!(tx.card_brand, DEFAULT_CARD_BRAND);
    }

    #[test]
    fn installments_split_amount() {
        let tx = transfer("alice", "merchant", 1_200).with_installments(6);
        assert_eq!(tx.installments, 6);
        assert_eq!(tx.installment_amount, 200);

        let zero = transfer("alice", "merchant", 500).with_installments(0);
        assert_eq!(zero.installments, 1);
        assert_eq!(zero.installment_amount, 500);

        // 333.33 rounds down, 166.67 rounds up
        assert_eq!(transfer("a", "m", 1_000).with_installments(3).installment_amount, 333);
        assert_eq!(transfer("a", "m", 1_000).with_installments(6).installment_amount, 167);
    }

    #[test]
    fn card_brand_is_serialized_but_not_hashed() {
        let tx = transfer("alice", "merchant", 1_000).with_timestamp(42);
        let visa = tx.clone().with_card_brand("VISA");
        assert_eq!(visa.card_brand, "VISA");
        assert_eq!(tx.compute_hash(), visa.compute_hash());

        let json = serde_json::to_value(&visa).unwrap();
        assert_eq!(json["card_brand"], "VISA");
    }

    #[test]
    fn ids_are_unique() {
        let a = transfer("alice", "bob", 1);
        let b = transfer("alice", "bob", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn hash_is_deterministic_and_content_sensitive() {
        let tx = transfer("alice", "bob", 1_000).with_timestamp(42);
        assert_eq!(tx.compute_hash(), tx.clone().compute_hash());
        assert_eq!(tx.compute_hash().len(), 64);

        let mut other = tx.clone();
        other.amount = 1_001;
        assert_ne!(tx.compute_hash(), other.compute_hash());
    }

    #[test]
    fn system_issued_is_always_valid() {
        let tx = Transaction::new(None, "bob", 0, TransactionType::Credit, "credit line");
        assert!(tx.is_valid());
        assert!(tx.is_system_issued());
    }

    #[test]
    fn missing_party_or_zero_amount_is_invalid() {
        assert!(!transfer("", "bob", 10).is_valid());
        assert!(!transfer("alice", " ", 10).is_valid());
        assert!(!transfer("alice", "bob", 0).is_valid());
        assert!(transfer("alice", "bob", 10).is_valid());
    }

    #[test]
    fn status_transitions() {
        let mut tx = transfer("alice", "bob", 10);
        tx.approve();
        tx.approve();
        assert_eq!(tx.status, TransactionStatus::Approved);
        tx.reject();
        assert_eq!(tx.status, TransactionStatus::Rejected);
    }

    #[test]
    fn apply_interest_leaves_installment_amount_untouched() {
        let mut tx = transfer("alice", "merchant", 1_000).with_installments(4);
        assert_eq!(tx.installment_amount, 250);

        tx.apply_interest(10.0);
        assert_eq!(tx.amount, 1_100);
        assert_eq!(tx.interest_rate, 10.0);
        // Still the pre-interest split.
        assert_eq!(tx.installment_amount, 250);
    }

    #[test]
    fn serializes_type_in_screaming_case() {
        let tx = Transaction::new(None, "miner", 10, TransactionType::MiningReward, "reward");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "MINING_REWARD");
        assert_eq!(json["status"], "PENDING");
        assert!(json["from_address"].is_null());
    }
}
