use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A sealed block: a batch of transactions linked to its predecessor by digest.
///
/// Immutable once appended; `timestamp` is audit-only and never validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix seconds (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the canonical JSON rendering of this block, lowercase hex.
    ///
    /// `serde_json::Value` objects are backed by a `BTreeMap`, so keys come
    /// out in sorted order at every nesting level: two blocks that are equal
    /// field-for-field hash identically no matter how they were built or
    /// which order a peer serialized them in. The digest becomes the next
    /// block's `previous_hash`, so every node must reproduce it byte-for-byte.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_value(self).expect("block serializes to JSON");
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    fn sample_block() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000,
            transactions: vec![Transaction {
                sender: "alice".into(),
                recipient: "bob".into(),
                amount: 5,
            }],
            proof: 35293,
            previous_hash: "ab".repeat(32),
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let b = sample_block();
        assert_eq!(b.hash(), b.hash());
        assert_eq!(b.hash(), sample_block().hash());
    }

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        let h = sample_block().hash();
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_ignores_wire_field_order() {
        let a: Block = serde_json::from_str(
            r#"{"index":2,"timestamp":1700000000,"transactions":[],"proof":7,"previous_hash":"1"}"#,
        )
        .unwrap();
        let b: Block = serde_json::from_str(
            r#"{"previous_hash":"1","proof":7,"transactions":[],"index":2,"timestamp":1700000000}"#,
        )
        .unwrap();
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn hash_changes_when_content_changes() {
        let b = sample_block();
        let mut tampered = b.clone();
        tampered.transactions[0].amount = 500;
        assert_ne!(b.hash(), tampered.hash());
    }
}
