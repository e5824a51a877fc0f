use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use super::block::Block;
use super::model::Blockchain;
use super::validation::is_valid_chain;

/// How long a single peer fetch may take before that peer is skipped.
pub const PEER_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A peer's view of its own chain, as served by its `GET /chain/` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Transport used to retrieve peer chains during consensus resolution.
///
/// Any transport failure (unreachable peer, timeout, non-success status,
/// undecodable body) surfaces as `None`; the resolver never sees errors.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn fetch_chain(&self, netloc: &str) -> Option<PeerChain>;
}

/// HTTP transport hitting each peer's chain endpoint.
pub struct HttpPeerClient {
    http: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(PEER_FETCH_TIMEOUT)
            .build()
            .expect("reqwest client builds with static config");
        Self { http }
    }
}

impl Default for HttpPeerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, netloc: &str) -> Option<PeerChain> {
        let url = format!("http://{netloc}/api/v1/chain/");
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("peer {netloc} unreachable: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("peer {netloc} answered {}", response.status());
            return None;
        }
        match response.json::<PeerChain>().await {
            Ok(peer_chain) => Some(peer_chain),
            Err(e) => {
                warn!("peer {netloc} sent a malformed chain: {e}");
                None
            }
        }
    }
}

/// Longest-valid-chain consensus over all registered peers.
///
/// Fetches run without the ledger lock. A peer that fails to respond, lies
/// about its length or fails validation simply contributes no candidate. A
/// candidate is adopted only while its length strictly exceeds the running
/// maximum, so equal-length chains never displace the incumbent. The final
/// swap re-checks strict superiority under the lock: a chain that grew
/// locally during the sweep is not overwritten by a now-equal candidate.
///
/// Returns whether the local chain was replaced.
pub async fn resolve_conflicts(ledger: &Mutex<Blockchain>, client: &dyn PeerClient) -> bool {
    let (peers, local_len, difficulty) = {
        let bc = ledger.lock().expect("ledger mutex poisoned");
        (
            bc.peers().iter().cloned().collect::<Vec<_>>(),
            bc.len(),
            bc.difficulty(),
        )
    };

    let mut max_length = local_len;
    let mut candidate: Option<Vec<Block>> = None;

    for peer in &peers {
        let Some(response) = client.fetch_chain(peer).await else {
            continue;
        };
        if response.length != response.chain.len() {
            warn!(
                "peer {peer} reported length {} for a chain of {} blocks",
                response.length,
                response.chain.len()
            );
            continue;
        }
        if response.length > max_length && is_valid_chain(&response.chain, difficulty) {
            debug!("peer {peer} offers a longer valid chain ({} blocks)", response.length);
            max_length = response.length;
            candidate = Some(response.chain);
        }
    }

    let Some(chain) = candidate else {
        return false;
    };

    let mut bc = ledger.lock().expect("ledger mutex poisoned");
    if chain.len() > bc.len() {
        info!(
            "replacing local chain ({} blocks) with peer chain ({} blocks)",
            bc.len(),
            chain.len()
        );
        bc.replace_chain(chain);
        true
    } else {
        // the local chain caught up while we were fetching
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{PeerChain, PeerClient, resolve_conflicts};
    use crate::blockchain::pow::find_proof;
    use crate::blockchain::{Block, Blockchain};

    /// Canned responses keyed by netloc; a missing or `None` entry plays a
    /// dead peer.
    struct StaticPeers(HashMap<String, Option<PeerChain>>);

    #[async_trait]
    impl PeerClient for StaticPeers {
        async fn fetch_chain(&self, netloc: &str) -> Option<PeerChain> {
            self.0.get(netloc).cloned().flatten()
        }
    }

    fn mined_chain(blocks: usize) -> Vec<Block> {
        let mut bc = Blockchain::new(1);
        while bc.len() < blocks {
            bc.new_transaction("a".into(), "b".into(), 1);
            let proof = find_proof(bc.last_block().proof, 1);
            bc.new_block(proof, None);
        }
        bc.chain
    }

    fn local_ledger(blocks: usize, peers: &[&str]) -> Mutex<Blockchain> {
        let mut bc = Blockchain::new(1);
        while bc.len() < blocks {
            let proof = find_proof(bc.last_block().proof, 1);
            bc.new_block(proof, None);
        }
        for peer in peers {
            bc.register_node(peer).unwrap();
        }
        Mutex::new(bc)
    }

    fn respond(chain: Vec<Block>) -> Option<PeerChain> {
        let length = chain.len();
        Some(PeerChain { chain, length })
    }

    #[actix_web::test]
    async fn equal_length_chain_never_displaces_incumbent() {
        let ledger = local_ledger(3, &["peer-a:5000"]);
        let client = StaticPeers(HashMap::from([(
            "peer-a:5000".to_string(),
            respond(mined_chain(3)),
        )]));

        assert!(!resolve_conflicts(&ledger, &client).await);
        assert_eq!(ledger.lock().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn longer_invalid_chain_is_ignored() {
        let ledger = local_ledger(3, &["peer-a:5000"]);
        let mut forged = mined_chain(4);
        forged[2].transactions[0].amount = 9_999;
        let client = StaticPeers(HashMap::from([("peer-a:5000".to_string(), respond(forged))]));

        assert!(!resolve_conflicts(&ledger, &client).await);
        assert_eq!(ledger.lock().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn longer_valid_chain_replaces_local() {
        let ledger = local_ledger(3, &["peer-a:5000"]);
        let longer = mined_chain(5);
        let tip_hash = longer.last().unwrap().hash();
        let client = StaticPeers(HashMap::from([(
            "peer-a:5000".to_string(),
            respond(longer),
        )]));

        assert!(resolve_conflicts(&ledger, &client).await);
        let bc = ledger.lock().unwrap();
        assert_eq!(bc.len(), 5);
        assert_eq!(bc.last_block().hash(), tip_hash);
    }

    #[actix_web::test]
    async fn dead_peer_does_not_abort_resolution() {
        let ledger = local_ledger(1, &["dead:5000", "alive:5000"]);
        let client = StaticPeers(HashMap::from([
            ("dead:5000".to_string(), None),
            ("alive:5000".to_string(), respond(mined_chain(2))),
        ]));

        assert!(resolve_conflicts(&ledger, &client).await);
        assert_eq!(ledger.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn misreported_length_contributes_no_candidate() {
        let ledger = local_ledger(1, &["liar:5000"]);
        let chain = mined_chain(2);
        let client = StaticPeers(HashMap::from([(
            "liar:5000".to_string(),
            Some(PeerChain { chain, length: 10 }),
        )]));

        assert!(!resolve_conflicts(&ledger, &client).await);
        assert_eq!(ledger.lock().unwrap().len(), 1);
    }
}
