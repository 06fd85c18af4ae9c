use actix_web::{HttpResponse, post, web};
use chrono::{Datelike, Utc};
use log::{debug, info, warn};
use std::time::Instant;

use super::models::{
    AppState, PaymentRequest, PaymentResponse, TransferRequest, TransferResponse,
};
use super::{ApiError, admit_and_seal, find_account};
use crate::invoice::price_installments;
use crate::transaction::{Transaction, TransactionType};

/// Merchant payments are credited to this address.
const MERCHANT_ADDRESS: &str = "MERCHANT";

/// Transfer funds to another account, identified by email.
#[post("/accounts/{address}/transfer/")]
pub async fn post_transfer(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
    body: web::Json<TransferRequest>,
) -> Result<HttpResponse, ApiError> {
    let t0 = Instant::now();
    let from = path.into_inner().0;
    debug!(
        "POST /transfer/ - from={} to={} amount={}",
        from, body.to_email, body.amount
    );

    if body.amount == 0 {
        warn!("POST /transfer/ - rejected: zero amount");
        return Err(ApiError::BadRequest("amount must be greater than 0".into()));
    }

    let (sender, recipient) = {
        let accounts = state.accounts.lock().expect("mutex poisoned");
        let sender = accounts
            .find_by_address(&from)
            .cloned()
            .ok_or(ApiError::NotFound("sender"))?;
        let recipient = accounts
            .find_by_email(body.to_email.trim())
            .cloned()
            .ok_or(ApiError::NotFound("recipient"))?;
        (sender, recipient)
    };

    // The ledger replays self-transfers as a no-op; refuse them here.
    if sender.id == recipient.id {
        warn!("POST /transfer/ - rejected: self-transfer by {}", sender.id);
        return Err(ApiError::BadRequest("cannot transfer to yourself".into()));
    }

    let description = body
        .description
        .clone()
        .unwrap_or_else(|| format!("Transfer to {}", recipient.name));
    let tx = Transaction::new(
        Some(sender.wallet_address.clone()),
        recipient.wallet_address.clone(),
        body.amount,
        TransactionType::Transfer,
        description,
    );

    let (transaction, block) = admit_and_seal(&state, tx)
        .await
        .inspect_err(|e| warn!("POST /transfer/ - rejected: {e}"))?;
    let new_balance = state
        .ledger
        .lock()
        .expect("mutex poisoned")
        .balance_of(&sender.wallet_address);

    info!(
        "POST /transfer/ - tx={} OK ({} ms)",
        transaction.id,
        t0.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(TransferResponse {
        transaction,
        block_hash: block.hash,
        new_balance,
    }))
}

/// Pay a merchant, optionally in installments, and bill it on the current
/// month's invoice.
#[post("/accounts/{address}/payment/")]
pub async fn post_payment(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
    body: web::Json<PaymentRequest>,
) -> Result<HttpResponse, ApiError> {
    let t0 = Instant::now();
    let from = path.into_inner().0;
    let installments = body.installments.unwrap_or(1);
    debug!(
        "POST /payment/ - from={} merchant={} amount={} installments={}",
        from, body.merchant_name, body.amount, installments
    );

    if body.merchant_name.trim().is_empty() {
        return Err(ApiError::BadRequest("merchant_name is required".into()));
    }
    let quote = price_installments(body.amount, installments)
        .inspect_err(|e| warn!("POST /payment/ - rejected: {e}"))?;
    let payer = find_account(&state, &from)?;

    let tx_type = if installments > 1 {
        TransactionType::InstallmentPayment
    } else {
        TransactionType::Payment
    };
    let description = body
        .description
        .clone()
        .unwrap_or_else(|| format!("Payment to {}", body.merchant_name.trim()));
    let mut tx = Transaction::new(
        Some(payer.wallet_address.clone()),
        MERCHANT_ADDRESS,
        quote.total_amount,
        tx_type,
        description,
    )
    .with_installments(installments);
    tx.interest_rate = quote.interest_rate;

    let (transaction, block) = admit_and_seal(&state, tx)
        .await
        .inspect_err(|e| warn!("POST /payment/ - rejected: {e}"))?;

    let new_balance = state
        .ledger
        .lock()
        .expect("mutex poisoned")
        .balance_of(&payer.wallet_address);

    let now = Utc::now();
    let invoice_id = {
        let mut invoices = state.invoices.lock().expect("mutex poisoned");
        let invoice = invoices.create_or_fetch(&payer.id, now.month(), now.year())?;
        invoice.add_transaction(&transaction)?;
        invoice.id.clone()
    };

    info!(
        "POST /payment/ - tx={} total={} invoice={} OK ({} ms)",
        transaction.id,
        quote.total_amount,
        invoice_id,
        t0.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(PaymentResponse {
        transaction,
        block_hash: block.hash,
        installments: quote.installments,
        installment_amount: quote.installment_amount,
        original_amount: quote.original_amount,
        total_amount: quote.total_amount,
        interest_rate: quote.interest_rate,
        interest_amount: quote.interest_amount(),
        invoice_id,
        new_balance,
    }))
}
