use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::blockchain::consensus::resolve_conflicts;

/// Register peer nodes by address. The whole call is rejected, with the peer
/// set untouched, if the body is not a list or any address fails to
/// normalize.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let req = body.into_inner();
    if req.nodes.is_empty() {
        return HttpResponse::BadRequest().body("please supply a list of peer addresses");
    }

    let total_nodes = {
        let mut bc = state.blockchain.lock().expect("ledger mutex poisoned");
        if let Err(msg) = bc.register_nodes(&req.nodes) {
            warn!("rejected peer registration: {msg}");
            return HttpResponse::BadRequest().body(msg);
        }
        bc.peers().iter().cloned().collect::<Vec<_>>()
    };

    info!("peer set now holds {} node(s)", total_nodes.len());
    HttpResponse::Created().json(RegisterNodesResponse {
        message: "new nodes have been added".to_string(),
        total_nodes,
    })
}

/// Run longest-valid-chain consensus against all registered peers and report
/// whether the local chain was replaced.
#[get("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let replaced = resolve_conflicts(&state.blockchain, state.peer_client.as_ref()).await;

    let chain = {
        let bc = state.blockchain.lock().expect("ledger mutex poisoned");
        bc.chain.clone()
    };
    let message = if replaced {
        "our chain was replaced"
    } else {
        "our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        chain,
    })
}
