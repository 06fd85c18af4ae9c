use actix_web::{HttpResponse, get, post, web};
use chrono::{Datelike, Utc};
use log::{info, warn};

use super::models::{AppState, InvoiceListResponse, InvoiceView, PayInvoiceRequest};
use super::{ApiError, find_account};

#[get("/accounts/{address}/invoices/")]
pub async fn list_invoices(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let account = find_account(&state, &path.into_inner().0)?;
    let invoices = state.invoices.lock().expect("mutex poisoned");
    let views: Vec<InvoiceView> = invoices
        .for_account(&account.id)
        .into_iter()
        .map(InvoiceView::from)
        .collect();
    Ok(HttpResponse::Ok().json(InvoiceListResponse {
        total: views.len(),
        invoices: views,
    }))
}

/// Current month's invoice, opened on first access.
#[get("/accounts/{address}/invoices/current/")]
pub async fn current_invoice(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let account = find_account(&state, &path.into_inner().0)?;
    let now = Utc::now();
    let mut invoices = state.invoices.lock().expect("mutex poisoned");
    let invoice = invoices.create_or_fetch(&account.id, now.month(), now.year())?;
    Ok(HttpResponse::Ok().json(InvoiceView::from(&*invoice)))
}

#[get("/accounts/{address}/invoices/{month}/{year}/")]
pub async fn invoice_by_month(
    state: web::Data<AppState>,
    path: web::Path<(String, u32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let (address, month, year) = path.into_inner();
    let account = find_account(&state, &address)?;
    let invoices = state.invoices.lock().expect("mutex poisoned");
    let invoice = invoices
        .find(&account.id, month, year)
        .ok_or(ApiError::NotFound("invoice"))?;
    Ok(HttpResponse::Ok().json(InvoiceView::from(invoice)))
}

#[post("/accounts/{address}/invoices/pay/")]
pub async fn pay_invoice(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
    body: web::Json<PayInvoiceRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.amount == 0 {
        warn!("POST /invoices/pay/ - rejected: zero amount");
        return Err(ApiError::BadRequest("invalid payment amount".into()));
    }
    let account = find_account(&state, &path.into_inner().0)?;

    let mut invoices = state.invoices.lock().expect("mutex poisoned");
    let invoice = invoices
        .find_by_id_mut(&body.invoice_id)
        .ok_or(ApiError::NotFound("invoice"))?;
    if invoice.account_id != account.id {
        warn!(
            "POST /invoices/pay/ - account {} tried to pay invoice {}",
            account.id, invoice.id
        );
        return Err(ApiError::Forbidden);
    }

    invoice.pay(body.amount)?;
    info!(
        "POST /invoices/pay/ - invoice={} paid={} status={:?}",
        invoice.id, invoice.paid_amount, invoice.status
    );
    Ok(HttpResponse::Ok().json(InvoiceView::from(&*invoice)))
}

#[post("/accounts/{address}/invoices/{id}/close/")]
pub async fn close_invoice(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (address, invoice_id) = path.into_inner();
    let account = find_account(&state, &address)?;

    let mut invoices = state.invoices.lock().expect("mutex poisoned");
    let invoice = invoices
        .find_by_id_mut(&invoice_id)
        .ok_or(ApiError::NotFound("invoice"))?;
    if invoice.account_id != account.id {
        return Err(ApiError::Forbidden);
    }

    invoice.close();
    info!(
        "POST /invoices/close/ - invoice={} status={:?} total={}",
        invoice.id, invoice.status, invoice.total_amount
    );
    Ok(HttpResponse::Ok().json(InvoiceView::from(&*invoice)))
}
