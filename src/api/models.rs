use crate::accounts::{Account, AccountDirectory};
use crate::blockchain::{Block, Blockchain, ChainFault, StatementEntry};
use crate::config::Settings;
use crate::invoice::{Invoice, InvoiceBook};
use crate::transaction::{Cents, Transaction};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state.
///
/// The ledger mutex guards blocks and pending pool together. When more than
/// one lock is needed, take them in the order accounts -> ledger -> invoices.
pub struct AppState {
    pub ledger: Mutex<Blockchain>,
    pub invoices: Mutex<InvoiceBook>,
    pub accounts: Mutex<AccountDirectory>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            ledger: Mutex::new(Blockchain::new(settings.difficulty, settings.mining_reward)),
            invoices: Mutex::new(InvoiceBook::new()),
            accounts: Mutex::new(AccountDirectory::new()),
            settings,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub blocks: usize,
    pub pending_transactions: usize,
    pub valid: bool,
    pub accounts: usize,
}

/* ---------- Account API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub account: Account,
    pub block_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct TransferRequest {
    pub to_email: String,
    pub amount: Cents,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct TransferResponse {
    pub transaction: Transaction,
    pub block_hash: String,
    pub new_balance: i128,
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub merchant_name: String,
    pub amount: Cents,
    pub description: Option<String>,
    pub installments: Option<u32>,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub transaction: Transaction,
    pub block_hash: String,
    pub installments: u32,
    pub installment_amount: Cents,
    pub original_amount: Cents,
    pub total_amount: Cents,
    pub interest_rate: f64,
    pub interest_amount: Cents,
    pub invoice_id: String,
    pub new_balance: i128,
}

/* ---------- Balance / Statement API Models ---------- */

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: i128,
    pub credit_limit: Cents,
    pub used: i128,
}

#[derive(Deserialize)]
pub struct PeriodQuery {
    pub start: i64,
    pub end: i64,
}

#[derive(Serialize)]
pub struct StatementResponse {
    pub transactions: Vec<StatementEntry>,
    pub total_transactions: usize,
    pub current_balance: i128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<(i64, i64)>,
}

/* ---------- Invoice API Models ---------- */

#[derive(Serialize)]
pub struct InvoiceView<'a> {
    #[serde(flatten)]
    pub invoice: &'a Invoice,
    pub remaining_balance: i128,
}

impl<'a> From<&'a Invoice> for InvoiceView<'a> {
    fn from(invoice: &'a Invoice) -> Self {
        Self {
            invoice,
            remaining_balance: invoice.remaining_balance(),
        }
    }
}

#[derive(Serialize)]
pub struct InvoiceListResponse<'a> {
    pub invoices: Vec<InvoiceView<'a>>,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct PayInvoiceRequest {
    pub invoice_id: String,
    pub amount: Cents,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub valid: bool,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub count: usize,
    pub pending_transactions: &'a [Transaction],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub fault: Option<ChainFault>,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

#[derive(Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: u32,
}
