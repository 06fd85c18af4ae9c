use actix_web::{HttpResponse, get, web};

use super::models::{AppState, BalanceResponse, PeriodQuery, StatementResponse};
use super::{ApiError, find_account};
use crate::blockchain::{LedgerEntry, statement::project_all};

#[get("/accounts/{address}/balance/")]
pub async fn get_balance(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let address = path.into_inner().0;
    let account = find_account(&state, &address)?;
    let balance = state
        .ledger
        .lock()
        .expect("mutex poisoned")
        .balance_of(&address);

    Ok(HttpResponse::Ok().json(BalanceResponse {
        address,
        balance,
        credit_limit: account.credit_limit,
        used: i128::from(account.credit_limit) - balance,
    }))
}

#[get("/accounts/{address}/statement/")]
pub async fn get_statement(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let address = path.into_inner().0;
    find_account(&state, &address)?;

    // Snapshot under the ledger lock, decorate afterwards.
    let (entries, balance) = {
        let bc = state.ledger.lock().expect("mutex poisoned");
        (bc.transactions_for_address(&address), bc.balance_of(&address))
    };
    Ok(statement_response(&state, &address, entries, balance, None))
}

#[get("/accounts/{address}/statement/period/")]
pub async fn get_statement_by_period(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let address = path.into_inner().0;
    let PeriodQuery { start, end } = query.into_inner();
    if start > end {
        return Err(ApiError::BadRequest("start must not be after end".into()));
    }
    find_account(&state, &address)?;

    let (entries, balance) = {
        let bc = state.ledger.lock().expect("mutex poisoned");
        (
            bc.transactions_by_period(&address, start, end),
            bc.balance_of(&address),
        )
    };
    Ok(statement_response(
        &state,
        &address,
        entries,
        balance,
        Some((start, end)),
    ))
}

fn statement_response(
    state: &AppState,
    address: &str,
    entries: Vec<LedgerEntry>,
    current_balance: i128,
    period: Option<(i64, i64)>,
) -> HttpResponse {
    let transactions = {
        let accounts = state.accounts.lock().expect("mutex poisoned");
        project_all(entries, address, &*accounts)
    };
    HttpResponse::Ok().json(StatementResponse {
        total_transactions: transactions.len(),
        transactions,
        current_balance,
        period,
    })
}
