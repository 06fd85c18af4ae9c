use chrono::Utc;
use serde::Serialize;

use super::{Block, MAX_DIFFICULTY};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{Cents, Transaction, TransactionType};

/// A transaction located in the ledger. Pending transactions carry no block.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub block_hash: Option<String>,
    pub block_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    InvalidTransactions,
    HashMismatch,
    BrokenLink,
}

/// First block failing verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainFault {
    pub index: usize,
    pub kind: FaultKind,
}

/// In-memory hash-chained ledger with a pending pool.
///
/// Blocks and the pending pool live in one value so a single lock guards
/// both; balances are always re-derived from history.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
    mining_reward: Cents,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32, mining_reward: Cents) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            difficulty: difficulty.min(MAX_DIFFICULTY),
            mining_reward,
        }
    }

    /// Return the last block in the chain.
    pub fn latest_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Admit a transaction into the pending pool. Nothing changes on error.
    pub fn add_transaction(&mut self, mut tx: Transaction) -> LedgerResult<&Transaction> {
        if tx.to_address.trim().is_empty()
            || tx.from_address.as_deref().is_some_and(|f| f.trim().is_empty())
        {
            return Err(LedgerError::MissingParty);
        }
        if !tx.is_valid() {
            return Err(LedgerError::InvalidTransaction);
        }
        if tx.amount == 0 {
            return Err(LedgerError::NonPositiveAmount);
        }
        if let Some(from) = tx.from_address.as_deref() {
            let balance = self.balance_of(from);
            if balance < i128::from(tx.amount) {
                return Err(LedgerError::InsufficientBalance {
                    balance,
                    required: tx.amount,
                });
            }
        }

        tx.approve();
        self.pending.push(tx);
        Ok(self.pending.last().expect("just pushed"))
    }

    /// Seal the pending pool into a mined block and queue the reward for
    /// `reward_address`. Blocks until the proof-of-work is found.
    pub fn mine_pending_transactions(&mut self, reward_address: &str) -> &Block {
        let transactions = std::mem::take(&mut self.pending);
        let mut block = Block::new(
            Utc::now().timestamp_millis(),
            transactions,
            self.latest_block().hash.clone(),
        );
        block.mine(self.difficulty);
        self.chain.push(block);

        let mut reward = Transaction::new(
            None,
            reward_address,
            self.mining_reward,
            TransactionType::MiningReward,
            "Mining Reward",
        );
        reward.approve();
        self.pending = vec![reward];

        self.latest_block()
    }

    /// Signed sum over every sealed and pending transaction touching `address`.
    pub fn balance_of(&self, address: &str) -> i128 {
        self.all_transactions().fold(0i128, |mut balance, tx| {
            if tx.from_address.as_deref() == Some(address) {
                balance -= i128::from(tx.amount);
            }
            if tx.to_address == address {
                balance += i128::from(tx.amount);
            }
            balance
        })
    }

    /// Every transaction where `address` is sender or recipient, in chain
    /// order followed by the pending pool.
    pub fn transactions_for_address(&self, address: &str) -> Vec<LedgerEntry> {
        self.entries()
            .filter(|e| e.transaction.involves(address))
            .collect()
    }

    /// Like `transactions_for_address`, limited to `start..=end` (epoch ms).
    pub fn transactions_by_period(&self, address: &str, start: i64, end: i64) -> Vec<LedgerEntry> {
        self.entries()
            .filter(|e| e.transaction.involves(address))
            .filter(|e| (start..=end).contains(&e.transaction.timestamp))
            .collect()
    }

    /// Validate linkage, hashes and transactions of every non-genesis block.
    pub fn is_chain_valid(&self) -> bool {
        self.find_invalid_block().is_none()
    }

    /// Walk the chain and report the first block that fails verification.
    pub fn find_invalid_block(&self) -> Option<ChainFault> {
        self.chain.windows(2).enumerate().find_map(|(i, pair)| {
            let (prev, current) = (&pair[0], &pair[1]);
            let kind = if !current.has_valid_transactions() {
                FaultKind::InvalidTransactions
            } else if !current.has_consistent_hash() {
                FaultKind::HashMismatch
            } else if current.previous_hash != prev.hash {
                FaultKind::BrokenLink
            } else {
                return None;
            };
            Some(ChainFault { index: i + 1, kind })
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn mining_reward(&self) -> Cents {
        self.mining_reward
    }

    /// Affects future blocks only; clamped to `MAX_DIFFICULTY`.
    pub fn set_difficulty(&mut self, difficulty: u32) -> u32 {
        self.difficulty = difficulty.min(MAX_DIFFICULTY);
        self.difficulty
    }

    fn all_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.chain
            .iter()
            .flat_map(|b| b.transactions.iter())
            .chain(self.pending.iter())
    }

    fn entries(&self) -> impl Iterator<Item = LedgerEntry> + '_ {
        let sealed = self.chain.iter().flat_map(|block| {
            block.transactions.iter().map(move |tx| LedgerEntry {
                transaction: tx.clone(),
                block_hash: Some(block.hash.clone()),
                block_timestamp: Some(block.timestamp),
            })
        });
        let pending = self.pending.iter().map(|tx| LedgerEntry {
            transaction: tx.clone(),
            block_hash: None,
            block_timestamp: None,
        });
        sealed.chain(pending)
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}
