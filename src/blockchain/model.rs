use std::mem;

use chrono::Utc;
use serde_json::Value;

use super::Block;
use crate::transaction::Transaction;

/// In-memory ledger: the block chain plus the pool of transactions waiting
/// to be mined. Sole owner of both; all mutation goes through the methods
/// below.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Return the last block in the chain.
    pub fn previous_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Append a block carrying the whole pending pool. The pool is drained
    /// in the same step, so a transaction lands in exactly one block.
    pub fn create_block(&mut self, proof: i64, previous_hash: String) -> &Block {
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: Utc::now().timestamp(),
            proof,
            previous_hash,
            transactions: mem::take(&mut self.pending),
        };
        self.chain.push(block);
        self.previous_block()
    }

    /// Queue a transaction and report the index of the block expected to
    /// hold it: the one after the current tip. Mining order is separate,
    /// so the index is a forecast, not a guarantee.
    pub fn add_transaction(&mut self, sender: String, receiver: String, amount: Value) -> u64 {
        self.pending.push(Transaction::new(sender, receiver, amount));
        self.previous_block().index + 1
    }

    /// Transactions waiting for the next mined block.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Swap in a replacement chain accepted by consensus resolution.
    /// The pending pool is left untouched.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
