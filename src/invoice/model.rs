use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    CLOSING_DAY, DUE_DAY, INSTALLMENT_INTEREST_RATE, LATE_INTEREST_RATE, MINIMUM_PAYMENT_PCT,
};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{Cents, Transaction, percent_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Open,
    Closed,
    Paid,
    Overdue,
}

/// Billing cycle for one account and month.
///
/// Holds copies of ledger transactions for reporting; the chain stays the
/// authority on their state.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: String,
    pub account_id: String,
    pub month: u32, // 1-12
    pub year: i32,
    pub transactions: Vec<Transaction>,
    pub total_amount: Cents,
    pub paid_amount: Cents,
    pub due_date: i64,     // epoch millis
    pub closing_date: i64, // epoch millis
    pub status: InvoiceStatus,
    pub minimum_payment: Cents,
    pub interest_rate: f64,
    pub late_interest_rate: f64,
    pub created_at: i64,
}

impl Invoice {
    pub fn new(account_id: impl Into<String>, month: u32, year: i32) -> LedgerResult<Self> {
        let closing_date = cycle_day_millis(year, month, CLOSING_DAY)?;
        let due_date = cycle_day_millis(year, month, DUE_DAY)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.into(),
            month,
            year,
            transactions: Vec::new(),
            total_amount: 0,
            paid_amount: 0,
            due_date,
            closing_date,
            status: InvoiceStatus::Open,
            minimum_payment: 0,
            interest_rate: INSTALLMENT_INTEREST_RATE,
            late_interest_rate: LATE_INTEREST_RATE,
            created_at: Utc::now().timestamp_millis(),
        })
    }

    /// Attribute a transaction to this cycle. Ownership and period are the
    /// caller's concern.
    pub fn add_transaction(&mut self, tx: &Transaction) -> LedgerResult<()> {
        self.total_amount = self
            .total_amount
            .checked_add(tx.amount)
            .ok_or_else(|| LedgerError::validation("invoice total overflow"))?;
        self.transactions.push(tx.clone());
        self.recompute_minimum();
        Ok(())
    }

    /// Overpayment is accepted as-is. Nothing changes on error.
    pub fn pay(&mut self, amount: Cents) -> LedgerResult<()> {
        self.paid_amount = self
            .paid_amount
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("invoice payment total overflow"))?;
        if self.paid_amount >= self.total_amount {
            self.status = InvoiceStatus::Paid;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.close_at(Utc::now().timestamp_millis());
    }

    /// Close the cycle as of `now` (epoch ms). Past the due date with money
    /// still owed, the invoice goes OVERDUE and late interest is charged.
    ///
    /// Each call charges again; there is no record of a prior penalty.
    pub fn close_at(&mut self, now: i64) {
        self.status = InvoiceStatus::Closed;
        if now > self.due_date && self.paid_amount < self.total_amount {
            self.status = InvoiceStatus::Overdue;
            self.apply_late_interest();
        }
    }

    /// May go negative after an overpayment.
    pub fn remaining_balance(&self) -> i128 {
        i128::from(self.total_amount) - i128::from(self.paid_amount)
    }

    pub fn installment_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.installments > 1)
    }

    pub fn is_for(&self, account_id: &str, month: u32, year: i32) -> bool {
        self.account_id == account_id && self.month == month && self.year == year
    }

    /// Saturates at `Cents::MAX`; closing has no error path.
    fn apply_late_interest(&mut self) {
        let unpaid = self.total_amount.saturating_sub(self.paid_amount);
        self.total_amount = self
            .total_amount
            .saturating_add(percent_of(unpaid, self.late_interest_rate));
        self.recompute_minimum();
    }

    fn recompute_minimum(&mut self) {
        self.minimum_payment = percent_of(self.total_amount, MINIMUM_PAYMENT_PCT);
    }
}

/// Midnight UTC of `day` in the given cycle month, in epoch millis.
fn cycle_day_millis(year: i32, month: u32, day: u32) -> LedgerResult<i64> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| LedgerError::validation(format!("invalid billing month {month}/{year}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;

    fn purchase(amount: Cents) -> Transaction {
        Transaction::new(
            Some("addr".into()),
            "MERCHANT",
            amount,
            TransactionType::Payment,
            "",
        )
    }

    fn after_due(inv: &Invoice) -> i64 {
        inv.due_date + 1
    }

    #[test]
    fn new_invoice_dates_and_defaults() {
        let inv = Invoice::new("acc-1", 3, 2025).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Open);
        assert_eq!(inv.total_amount, 0);
        assert_eq!(inv.minimum_payment, 0);
        // 2025-03-05 / 2025-03-15 00:00 UTC
        assert_eq!(inv.closing_date, 1_741_132_800_000);
        assert_eq!(inv.due_date, 1_741_996_800_000);
        assert_eq!(inv.interest_rate, 2.5);
        assert_eq!(inv.late_interest_rate, 5.0);
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(matches!(
            Invoice::new("acc-1", 13, 2025),
            Err(LedgerError::Validation(_))
        ));
        assert!(Invoice::new("acc-1", 0, 2025).is_err());
    }

    #[test]
    fn add_transaction_accumulates_and_recomputes_minimum() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();
        assert_eq!(inv.total_amount, 10_000);
        assert_eq!(inv.minimum_payment, 1_500);

        inv.add_transaction(&purchase(2_000)).unwrap();
        assert_eq!(inv.total_amount, 12_000);
        assert_eq!(inv.minimum_payment, 1_800);
        assert_eq!(inv.transactions.len(), 2);
    }

    #[test]
    fn partial_then_full_payment() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();

        inv.pay(4_000).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Open);
        assert_eq!(inv.remaining_balance(), 6_000);

        inv.pay(6_000).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.remaining_balance(), 0);
    }

    #[test]
    fn overpayment_is_accepted() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(1_000)).unwrap();
        inv.pay(1_500).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.remaining_balance(), -500);
    }

    #[test]
    fn close_before_due_date() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();
        inv.close_at(inv.due_date);
        assert_eq!(inv.status, InvoiceStatus::Closed);
        assert_eq!(inv.total_amount, 10_000);
    }

    #[test]
    fn close_after_due_date_charges_late_interest() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();
        inv.pay(2_000).unwrap();

        inv.close_at(after_due(&inv));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
        // 5% of the 8_000 unpaid
        assert_eq!(inv.total_amount, 10_400);
        assert_eq!(inv.minimum_payment, 1_560);
    }

    #[test]
    fn closing_twice_charges_late_interest_twice() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();
        let now = after_due(&inv);

        inv.close_at(now);
        inv.close_at(now);
        // 10_000 -> 10_500 -> 11_025
        assert_eq!(inv.total_amount, 11_025);
        assert_eq!(inv.status, InvoiceStatus::Overdue);
    }

    #[test]
    fn closing_a_paid_invoice_marks_it_closed() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(1_000)).unwrap();
        inv.pay(1_000).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);

        inv.close_at(after_due(&inv));
        assert_eq!(inv.status, InvoiceStatus::Closed);
        assert_eq!(inv.total_amount, 1_000);
    }

    #[test]
    fn paying_an_overdue_invoice_in_full() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(10_000)).unwrap();
        inv.close_at(after_due(&inv));
        inv.pay(10_500).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn installment_transactions_filter() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(1_000)).unwrap();
        inv.add_transaction(&purchase(1_200).with_installments(6)).unwrap();
        let ids: Vec<_> = inv.installment_transactions().map(|t| t.installments).collect();
        assert_eq!(ids, vec![6]);
    }

    #[test]
    fn payment_overflow_is_rejected_without_side_effects() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.pay(u64::MAX).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);

        assert!(matches!(inv.pay(1), Err(LedgerError::Validation(_))));
        assert_eq!(inv.paid_amount, u64::MAX);
    }

    #[test]
    fn total_overflow_is_rejected_without_side_effects() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(u64::MAX)).unwrap();

        assert!(matches!(
            inv.add_transaction(&purchase(1)),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(inv.total_amount, u64::MAX);
        assert_eq!(inv.transactions.len(), 1);
    }

    #[test]
    fn late_interest_saturates() {
        let mut inv = Invoice::new("acc-1", 1, 2025).unwrap();
        inv.add_transaction(&purchase(u64::MAX)).unwrap();
        inv.close_at(after_due(&inv));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
        assert_eq!(inv.total_amount, u64::MAX);
    }
}
