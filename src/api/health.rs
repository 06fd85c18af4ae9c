use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, HealthResponse};

#[get("/health/")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let accounts = state.accounts.lock().expect("mutex poisoned").len();
    let bc = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        blocks: bc.len(),
        pending_transactions: bc.pending_transactions().len(),
        valid: bc.is_chain_valid(),
        accounts,
    })
}
