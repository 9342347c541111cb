use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain. `previous_hash` links it to its predecessor's
/// canonical digest; `proof` solves the PoW puzzle against the predecessor's
/// proof. Blocks are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub proof: i64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: Utc::now().timestamp(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            transactions: Vec::new(),
        }
    }

    /// Canonical SHA-256 digest of the block, hex encoded.
    ///
    /// The block is rendered as JSON with lexicographically sorted keys
    /// (`serde_json`'s value tree orders map keys), so two blocks with equal
    /// field values always produce the same digest, transactions included.
    pub fn compute_hash(&self) -> String {
        let canonical = serde_json::to_value(self)
            .expect("serialize block")
            .to_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
