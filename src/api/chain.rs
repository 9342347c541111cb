use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};
use serde_json::json;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::blockchain::{pow, validate};

/// Get the full blockchain. Peers read this route during resolution.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        chain: &bc.chain,
        length: bc.len(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ValidateResponse {
        valid: validate::is_valid_chain(&bc.chain),
        length: bc.len(),
    };
    HttpResponse::Ok().json(resp)
}

/// Mine the next block:
/// - queue the node's reward transaction so it rides in this block
/// - snapshot the tip, then run the PoW search off the ledger lock
/// - commit the block, carrying the whole pending pool
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let (previous_proof, previous_hash) = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.add_transaction(state.node_id.clone(), state.node_name.clone(), json!("1"));
        let tip = bc.previous_block();
        (tip.proof, tip.compute_hash())
    };

    // CPU-bound search, offloaded so worker threads keep serving requests.
    let proof = match web::block(move || pow::solve(previous_proof)).await {
        Ok(proof) => proof,
        Err(e) => {
            warn!("mining task failed: {e}");
            return HttpResponse::InternalServerError().body("mining task failed");
        }
    };

    let resp = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        // A proof against a stale predecessor would not validate, so refuse
        // to commit if resolution swapped the chain while we were mining.
        if bc.previous_block().compute_hash() != previous_hash {
            warn!("chain tip moved while mining, discarding proof {proof}");
            return HttpResponse::Conflict().body("chain tip moved while mining");
        }
        let block = bc.create_block(proof, previous_hash);
        MineResponse {
            message: "new block mined".to_string(),
            index: block.index,
            timestamp: block.timestamp,
            proof: block.proof,
            previous_hash: block.previous_hash.clone(),
            transactions: block.transactions.clone(),
        }
    };

    info!(
        "MINER - sealed block #{} (proof={}, txs={})",
        resp.index,
        resp.proof,
        resp.transactions.len()
    );
    HttpResponse::Ok().json(resp)
}
