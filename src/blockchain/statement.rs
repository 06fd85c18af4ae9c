use serde::Serialize;

use super::LedgerEntry;
use crate::transaction::TransactionType;

/// Read-only party lookup used to decorate statements.
pub trait AccountLookup {
    fn display_name(&self, address: &str) -> Option<String>;
}

/// Statement row: a ledger entry seen from one account's point of view.
#[derive(Debug, Clone, Serialize)]
pub struct StatementEntry {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    pub other_party: String,
    pub transaction_type: String,
}

impl StatementEntry {
    pub fn project(entry: LedgerEntry, viewer: &str, lookup: &impl AccountLookup) -> Self {
        let tx = &entry.transaction;
        let is_transfer = tx.tx_type == TransactionType::Transfer;

        let (other_party, transaction_type) = if tx.from_address.as_deref() == Some(viewer) {
            let name = lookup
                .display_name(&tx.to_address)
                .unwrap_or_else(|| tx.to_address.clone());
            (name, if is_transfer { "SENT" } else { tx.tx_type.as_str() })
        } else if tx.to_address == viewer {
            let name = match tx.from_address.as_deref() {
                Some(from) => lookup.display_name(from).unwrap_or_else(|| from.to_string()),
                None => "SYSTEM".to_string(),
            };
            (name, if is_transfer { "RECEIVED" } else { tx.tx_type.as_str() })
        } else {
            (String::new(), tx.tx_type.as_str())
        };

        Self {
            other_party,
            transaction_type: transaction_type.to_string(),
            entry,
        }
    }
}

pub fn project_all(
    entries: Vec<LedgerEntry>,
    viewer: &str,
    lookup: &impl AccountLookup,
) -> Vec<StatementEntry> {
    entries
        .into_iter()
        .map(|e| StatementEntry::project(e, viewer, lookup))
        .collect()
}
