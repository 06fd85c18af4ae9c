use actix_web::{HttpResponse, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, RegisterRequest, RegisterResponse};
use super::{ApiError, admit_and_seal, find_account};
use crate::transaction::{Transaction, TransactionType};

/// Register an account and grant its credit line as a system-issued CREDIT.
///
/// The line is always the configured `initial_credit_limit`.
#[post("/accounts/")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let credit_limit = state.settings.initial_credit_limit;
    if credit_limit == 0 {
        warn!("POST /accounts/ - rejected: no credit line configured");
        return Err(ApiError::BadRequest("credit line not available".into()));
    }

    let account = {
        let mut accounts = state.accounts.lock().expect("mutex poisoned");
        accounts
            .register(&body.name, &body.email, credit_limit)
            .inspect_err(|e| warn!("POST /accounts/ - rejected: {e}"))?
    };
    debug!(
        "POST /accounts/ - registered {} with wallet {}",
        account.id, account.wallet_address
    );

    let initial_credit = Transaction::new(
        None,
        account.wallet_address.clone(),
        credit_limit,
        TransactionType::Credit,
        "Initial Credit Limit",
    );
    let (_, block) = admit_and_seal(&state, initial_credit).await?;

    info!(
        "POST /accounts/ - account {} credited {} (block {})",
        account.id, credit_limit, block.hash
    );
    Ok(HttpResponse::Created().json(RegisterResponse {
        account,
        block_hash: block.hash,
    }))
}

#[get("/accounts/{address}/")]
pub async fn get_account(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let address = path.into_inner().0;
    let account = find_account(&state, &address)?;
    Ok(HttpResponse::Ok().json(account))
}
