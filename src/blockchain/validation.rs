use super::GENESIS_PREVIOUS_HASH;
use super::block::Block;
use super::pow::valid_proof;

/// Check a candidate chain for internal consistency: genesis sentinel, index
/// continuity, hash linkage and pairwise proof-of-work.
///
/// The input is untrusted wire data, typically deserialized from a peer's
/// `GET /chain/` response. Nothing here mutates state or panics; the walk
/// short-circuits on the first violated invariant. An empty chain is a
/// transport fault and never valid.
pub fn is_valid_chain(chain: &[Block], difficulty: u32) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };
    if genesis.index != 1 || genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return false;
    }
    for pair in chain.windows(2) {
        let (prev, block) = (&pair[0], &pair[1]);
        if block.index != prev.index + 1 {
            return false;
        }
        if block.previous_hash != prev.hash() {
            return false;
        }
        if !valid_proof(prev.proof, block.proof, difficulty) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::is_valid_chain;
    use crate::blockchain::pow::find_proof;
    use crate::blockchain::{Block, Blockchain};

    /// Mine a chain of `blocks` blocks at difficulty 1, one transaction per
    /// block so tampering tests have something to flip.
    fn mined_chain(blocks: usize) -> Vec<Block> {
        let mut bc = Blockchain::new(1);
        while bc.len() < blocks {
            bc.new_transaction("a".into(), "b".into(), bc.len() as i64);
            let proof = find_proof(bc.last_block().proof, 1);
            bc.new_block(proof, None);
        }
        bc.chain
    }

    #[test]
    fn genesis_only_chain_is_valid() {
        assert!(is_valid_chain(&mined_chain(1), 1));
    }

    #[test]
    fn mined_chain_is_valid() {
        assert!(is_valid_chain(&mined_chain(3), 1));
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(!is_valid_chain(&[], 1));
    }

    #[test]
    fn tampered_transaction_breaks_linkage() {
        let mut chain = mined_chain(3);
        chain[1].transactions[0].amount = 9_999;
        assert!(!is_valid_chain(&chain, 1));
    }

    #[test]
    fn broken_proof_is_rejected_even_with_good_links() {
        use crate::blockchain::pow::valid_proof;

        let mut chain = mined_chain(3);
        // corrupt block 2's proof, then repair the hash links so only the
        // proof check can fail
        let mut bad = chain[1].proof + 1;
        while valid_proof(chain[0].proof, bad, 1) {
            bad += 1;
        }
        chain[1].proof = bad;
        chain[2].previous_hash = chain[1].hash();
        assert!(!is_valid_chain(&chain, 1));
    }

    #[test]
    fn wrong_genesis_sentinel_is_rejected() {
        let mut chain = mined_chain(2);
        chain[0].previous_hash = "0".into();
        chain[1].previous_hash = chain[0].hash();
        assert!(!is_valid_chain(&chain, 1));
    }

    #[test]
    fn non_contiguous_index_is_rejected() {
        let mut chain = mined_chain(3);
        chain[2].index = 7;
        assert!(!is_valid_chain(&chain, 1));
    }
}
