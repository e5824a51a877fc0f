use std::collections::HashSet;
use std::mem;

use url::Url;

use super::block::Block;
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// In-memory ledger: the chain, the pending-transaction pool and the set of
/// registered peer addresses (kept in `host:port` form).
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: HashSet<String>,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new ledger seeded with the genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: HashSet::new(),
            difficulty,
        };
        bc.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        bc
    }

    /// Return the most recently appended block.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    /// Seal the pending pool into a new block appended to the chain.
    ///
    /// `previous_hash` defaults to the digest of the current last block. The
    /// proof is taken on trust: the miner that found it already checked it,
    /// and foreign chains are re-validated wholesale during consensus.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let block = Block::new(
            self.chain.len() as u64 + 1,
            mem::take(&mut self.pending),
            proof,
            previous_hash,
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Queue a transaction for the next mined block; returns the index of the
    /// block that will eventually contain it.
    pub fn new_transaction(&mut self, sender: String, recipient: String, amount: i64) -> u64 {
        self.pending.push(Transaction {
            sender,
            recipient,
            amount,
        });
        self.last_block().index + 1
    }

    /// Normalize `address` to its network location and add it to the peer
    /// set. Idempotent; accepts addresses with or without a scheme.
    pub fn register_node(&mut self, address: &str) -> Result<String, String> {
        let netloc = normalize_netloc(address)?;
        self.peers.insert(netloc.clone());
        Ok(netloc)
    }

    /// Register a batch of peer addresses. Nothing is inserted unless every
    /// address normalizes, so a rejected request leaves the peer set alone.
    pub fn register_nodes(&mut self, addresses: &[String]) -> Result<(), String> {
        let netlocs = addresses
            .iter()
            .map(|a| normalize_netloc(a))
            .collect::<Result<Vec<_>, _>>()?;
        self.peers.extend(netlocs);
        Ok(())
    }

    /// Wholesale chain substitution. Consensus resolution is the only caller;
    /// everything else only ever appends.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    pub fn peers(&self) -> &HashSet<String> {
        &self.peers
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}

/// Reduce a peer address to `host:port`. `url::Url` only parses absolute
/// URLs, so bare `host:port` addresses get a scheme prepended first.
fn normalize_netloc(address: &str) -> Result<String, String> {
    let absolute = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    let parsed =
        Url::parse(&absolute).map_err(|e| format!("invalid peer address '{address}': {e}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| format!("peer address '{address}' has no host"))?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
