use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blockchain::consensus::{HttpPeerClient, PeerClient};
use crate::blockchain::{Block, Blockchain, DEFAULT_DIFFICULTY};
use crate::transaction::Transaction;

/// Shared application state: the ledger behind one mutex (covering chain,
/// pending pool and peer set), this node's identity (the mining-reward
/// recipient) and the transport used to fetch peer chains.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub node_id: String,
    pub peer_client: Arc<dyn PeerClient>,
}

impl AppState {
    pub fn new(difficulty: u32, peer_client: Arc<dyn PeerClient>) -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::new(difficulty)),
            node_id: Uuid::new_v4().simple().to_string(),
            peer_client,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY, Arc::new(HttpPeerClient::new()))
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}

#[derive(Serialize)]
pub struct NewTransactionResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Nodes API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}
