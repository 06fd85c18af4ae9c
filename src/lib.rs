//! Append-only credit/debit ledger: hash-chained blocks sealed by a small
//! proof-of-work, balances re-derived by replay, and monthly invoices with
//! installment and late-interest math on top.

pub mod accounts;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod invoice;
pub mod transaction;
pub mod wallet;
