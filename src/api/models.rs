use std::env;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::blockchain::{Block, Blockchain};
use crate::network::{ConsensusResolver, HttpChainFetch, PeerRegistry};
use crate::transaction::Transaction;

/// Shared application state: the in-memory ledger, the peer registry and
/// the consensus resolver, plus this node's identity.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub peers: Mutex<PeerRegistry>,
    pub resolver: ConsensusResolver<HttpChainFetch>,
    /// Reward sender credited on each mined block.
    pub node_id: String,
    /// Reward receiver; configurable so operators can tell nodes apart.
    pub node_name: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::new()),
            peers: Mutex::new(PeerRegistry::new()),
            resolver: ConsensusResolver::new(HttpChainFetch::new()),
            node_id: Uuid::new_v4().simple().to_string(),
            node_name: env::var("NODE_NAME").unwrap_or_else(|_| "node".to_string()),
        }
    }
}

/* ---------- Chain API Models ---------- */

/// Also the chain-query contract consumed by peers during resolution.
#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: i64,
    pub proof: i64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: Value,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Peer / Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterPeersRequest {
    pub peers: Vec<String>,
}

#[derive(Serialize)]
pub struct PeersResponse {
    pub count: usize,
    pub peers: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub pending: usize,
    pub peers: usize,
    pub node_id: String,
}
