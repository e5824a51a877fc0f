use actix_web::{HttpResponse, Responder, get, post, web};
use log::debug;

use super::models::{AppState, NewTransactionRequest, NewTransactionResponse, PendingResponse};

/// Submit a transaction into the pending pool.
///
/// A body missing any of the three fields fails deserialization and is
/// rejected with 400 before any state is touched.
#[post("/transactions/new/")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> impl Responder {
    let req = body.into_inner();
    let index = {
        let mut bc = state.blockchain.lock().expect("ledger mutex poisoned");
        bc.new_transaction(req.sender, req.recipient, req.amount)
    };
    debug!("queued transaction for block {index}");

    HttpResponse::Created().json(NewTransactionResponse {
        message: format!("transaction will be added to block {index}"),
    })
}

/// List the transactions waiting for the next mined block.
#[get("/transactions/pending/")]
pub async fn pending_transactions(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("ledger mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: bc.pending().len(),
        transactions: bc.pending().to_vec(),
    })
}
