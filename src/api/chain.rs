use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{
    AppState, ChainResponse, DifficultyResponse, PendingResponse, SetDifficultyRequest,
    ValidateResponse,
};
use super::ApiError;
use crate::blockchain::MAX_DIFFICULTY;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: bc.len(),
        difficulty: bc.difficulty(),
        valid: bc.is_chain_valid(),
        chain: bc.blocks(),
    };
    HttpResponse::Ok().json(resp)
}

/// Transactions admitted but not yet sealed.
#[get("/chain/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let bc = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        count: bc.pending_transactions().len(),
        pending_transactions: bc.pending_transactions(),
    })
}

/// Validate the whole chain.
#[get("/chain/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.ledger.lock().expect("mutex poisoned");
    let fault = bc.find_invalid_block();
    if let Some(f) = fault {
        warn!("chain verification failed at block #{} ({:?})", f.index, f.kind);
    }
    HttpResponse::Ok().json(ValidateResponse {
        valid: fault.is_none(),
        length: bc.len(),
        difficulty: bc.difficulty(),
        fault,
    })
}

/// Get current PoW difficulty.
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let bc = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: bc.difficulty(),
    })
}

/// Update PoW difficulty (affects future blocks only).
#[post("/difficulty/")]
pub async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<SetDifficultyRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.difficulty > MAX_DIFFICULTY {
        warn!("POST /difficulty/ - rejected: {}", body.difficulty);
        return Err(ApiError::BadRequest(format!(
            "difficulty too high (max {MAX_DIFFICULTY})"
        )));
    }
    let mut bc = state.ledger.lock().expect("mutex poisoned");
    let difficulty = bc.set_difficulty(body.difficulty);
    info!("difficulty set to {difficulty}");
    Ok(HttpResponse::Ok().json(DifficultyResponse { difficulty }))
}
