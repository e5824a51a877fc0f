use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};
use crate::blockchain::validation::is_valid_chain;

/// Get the full chain and its length.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("ledger mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: &bc.chain,
        length: bc.len(),
    })
}

/// Run the chain validator against the local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("ledger mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: is_valid_chain(&bc.chain, bc.difficulty()),
        length: bc.len(),
    })
}
