mod accounts;
mod balance;
mod chain;
mod error;
mod health;
mod invoice;
pub mod models;
mod tx;

use actix_web::web::{self, ServiceConfig};
use log::info;

use crate::accounts::Account;
use crate::blockchain::Block;
use crate::transaction::Transaction;
pub use error::ApiError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(accounts::register)
            .service(accounts::get_account)
            .service(tx::post_transfer)
            .service(tx::post_payment)
            .service(balance::get_balance)
            .service(balance::get_statement)
            .service(balance::get_statement_by_period)
            .service(invoice::list_invoices)
            .service(invoice::current_invoice)
            .service(invoice::pay_invoice)
            .service(invoice::invoice_by_month)
            .service(invoice::close_invoice)
            .service(chain::get_chain)
            .service(chain::get_pending)
            .service(chain::validate_chain)
            .service(chain::get_difficulty)
            .service(chain::set_difficulty),
    );
}

/// Admit `tx` and seal it into a new block.
///
/// Runs on the blocking pool: proof-of-work holds the ledger lock until the
/// block is mined, so admission and sealing are one critical section.
async fn admit_and_seal(
    state: &web::Data<AppState>,
    tx: Transaction,
) -> Result<(Transaction, Block), ApiError> {
    let state = state.clone();
    let (admitted, block) = web::block(move || {
        let mut bc = state.ledger.lock().expect("mutex poisoned");
        let admitted = bc.add_transaction(tx)?.clone();
        let block = bc
            .mine_pending_transactions(&state.settings.reward_address)
            .clone();
        Ok::<_, ApiError>((admitted, block))
    })
    .await??;

    info!(
        "MINER - sealed block (hash={}, nonce={}, txs={}) for tx {}",
        block.hash,
        block.nonce,
        block.transactions.len(),
        admitted.id
    );
    Ok((admitted, block))
}

/// Resolve the calling account from its wallet address.
fn find_account(state: &AppState, address: &str) -> Result<Account, ApiError> {
    let accounts = state.accounts.lock().expect("mutex poisoned");
    accounts
        .find_by_address(address)
        .cloned()
        .ok_or(ApiError::NotFound("account"))
}
