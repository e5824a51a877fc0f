use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, info};

use super::models::{AppState, MineResponse};
use crate::blockchain::pow::find_proof;
use crate::transaction::{MINING_REWARD, REWARD_SENDER};

/// Mine the next block: solve the puzzle posed by the current head, credit
/// the reward transaction, seal the pending pool.
///
/// The proof search runs on the blocking thread pool with no lock held; only
/// the final reward-credit + seal takes the ledger lock, as one critical
/// section so no concurrently submitted transaction is dropped or
/// double-included around the pool drain.
#[get("/mine/")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    let (last_proof, difficulty) = {
        let bc = state.blockchain.lock().expect("ledger mutex poisoned");
        (bc.last_block().proof, bc.difficulty())
    };

    let proof = match web::block(move || find_proof(last_proof, difficulty)).await {
        Ok(proof) => proof,
        Err(e) => {
            return HttpResponse::InternalServerError().body(format!("mining worker failed: {e}"));
        }
    };
    debug!("found proof {proof} for last_proof {last_proof} at difficulty {difficulty}");

    let response = {
        let mut bc = state.blockchain.lock().expect("ledger mutex poisoned");
        bc.new_transaction(REWARD_SENDER.to_string(), state.node_id.clone(), MINING_REWARD);
        let block = bc.new_block(proof, None);
        MineResponse {
            message: "new block forged".to_string(),
            index: block.index,
            transactions: block.transactions.clone(),
            proof: block.proof,
            previous_hash: block.previous_hash.clone(),
        }
    };

    info!(
        "MINER - sealed block #{} ({} txs, proof={})",
        response.index,
        response.transactions.len(),
        response.proof
    );
    HttpResponse::Ok().json(response)
}
