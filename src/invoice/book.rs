use super::Invoice;
use crate::error::LedgerResult;

/// In-memory invoice store, kept in creation order.
#[derive(Debug, Default)]
pub struct InvoiceBook {
    invoices: Vec<Invoice>,
}

impl InvoiceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cycle for (account, month, year), opening it on first use.
    pub fn create_or_fetch(
        &mut self,
        account_id: &str,
        month: u32,
        year: i32,
    ) -> LedgerResult<&mut Invoice> {
        let existing = self
            .invoices
            .iter()
            .position(|inv| inv.is_for(account_id, month, year));
        let pos = match existing {
            Some(pos) => pos,
            None => {
                self.invoices.push(Invoice::new(account_id, month, year)?);
                self.invoices.len() - 1
            }
        };
        Ok(&mut self.invoices[pos])
    }

    pub fn find(&self, account_id: &str, month: u32, year: i32) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|inv| inv.is_for(account_id, month, year))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Invoice> {
        self.invoices.iter_mut().find(|inv| inv.id == id)
    }

    pub fn for_account(&self, account_id: &str) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|inv| inv.account_id == account_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
