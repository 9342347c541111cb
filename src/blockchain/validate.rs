use super::{Block, pow};

/// Validate a chain's internal consistency: hash linkage and the PoW
/// predicate for every adjacent pair. Read-only, O(n), first failure wins;
/// the stored proofs are re-checked with one digest each, never a search.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }
    for i in 1..chain.len() {
        let previous = &chain[i - 1];
        let block = &chain[i];
        if block.previous_hash != previous.compute_hash() {
            return false;
        }
        if !pow::verifies(block.proof, previous.proof) {
            return false;
        }
    }
    true
}
