use sha2::{Digest, Sha256};

/// Reports whether `proof` solves the puzzle posed by `last_proof`: the
/// SHA-256 of the two proofs, concatenated in decimal form, must start with
/// `difficulty` zero hex characters.
pub fn valid_proof(last_proof: u64, proof: u64, difficulty: u32) -> bool {
    let guess = format!("{last_proof}{proof}");
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    let target = "0".repeat(difficulty as usize);
    digest.starts_with(&target)
}

/// Sequential search for the lowest proof satisfying [`valid_proof`].
///
/// Pure and unbounded; with a fixed difficulty it terminates in expectation.
/// Callers must run it off any shared lock.
pub fn find_proof(last_proof: u64, difficulty: u32) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(last_proof, proof, difficulty) {
        proof += 1;
    }
    proof
}
