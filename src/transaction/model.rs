use serde::{Deserialize, Serialize};

/// Sender identifier marking a mining-reward transaction.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the node that seals a block.
pub const MINING_REWARD: i64 = 1;

/// A transfer of `amount` from `sender` to `recipient`.
///
/// Identifiers are opaque strings and amounts are taken as-is: the core
/// neither authenticates the sender nor checks the sign of the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}
