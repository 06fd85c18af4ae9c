use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::blockchain::AccountLookup;
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::Cents;
use crate::wallet::derive_address;

/// Credit line granted on registration (cents).
pub const DEFAULT_CREDIT_LIMIT: Cents = 500_000;

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub wallet_address: String,
    pub credit_limit: Cents,
    pub created_at: i64,
}

/// In-memory account registry. Read by the ledger only through
/// `AccountLookup`.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        credit_limit: Cents,
    ) -> LedgerResult<Account> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(LedgerError::validation("name and email are required"));
        }
        if self.find_by_email(email).is_some() {
            return Err(LedgerError::validation("email already exists"));
        }

        let created_at = Utc::now().timestamp_millis();
        let mut salt = Utc::now().timestamp_nanos_opt().unwrap_or(created_at);
        let mut wallet_address = derive_address(email, salt);
        while self.find_by_address(&wallet_address).is_some() {
            salt = salt.wrapping_add(1);
            wallet_address = derive_address(email, salt);
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            wallet_address,
            credit_limit,
            created_at,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn find_by_address(&self, address: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.wallet_address == address)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }
}

impl AccountLookup for AccountDirectory {
    fn display_name(&self, address: &str) -> Option<String> {
        self.find_by_address(address).map(|a| a.name.clone())
    }
}
