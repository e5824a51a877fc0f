pub mod block;
pub mod consensus;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zero hex chars).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Upper bound accepted from configuration (keep low in dev to avoid long waits).
pub const MAX_DIFFICULTY: u32 = 6;

/// `previous_hash` sentinel of the genesis block. Every node in the network
/// must agree on this value or their chains will never cross-validate.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof stored in the genesis block (sealed without a PoW search).
pub const GENESIS_PROOF: u64 = 100;
