use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, PeersResponse, RegisterPeersRequest, ResolveResponse};

/// Register a batch of peer addresses. Registration is idempotent and never
/// fails on malformed input; the normalized set is echoed back.
#[post("/peers/")]
pub async fn register_peers(
    state: web::Data<AppState>,
    body: web::Json<RegisterPeersRequest>,
) -> impl Responder {
    if body.peers.is_empty() {
        return HttpResponse::BadRequest().body("no peers supplied");
    }

    let snapshot = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        for address in &body.peers {
            peers.register(address);
        }
        peers.snapshot()
    };

    info!("PEERS - registry now holds {} address(es)", snapshot.len());
    HttpResponse::Created().json(PeersResponse {
        count: snapshot.len(),
        peers: snapshot,
    })
}

/// List the known peers.
#[get("/peers/")]
pub async fn list_peers(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PeersResponse {
        count: peers.len(),
        peers: peers.snapshot(),
    })
}

/// Run consensus resolution against the registered peers and report the
/// (possibly replaced) local chain.
#[post("/resolve/")]
pub async fn resolve_consensus(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let registry = state.peers.lock().expect("mutex poisoned");
        registry.snapshot()
    };

    let replaced = state.resolver.resolve(&peers, &state.blockchain).await;

    let (length, chain) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (bc.len(), bc.chain.clone())
    };

    if replaced {
        info!("CONSENSUS - chain replaced, new height {length}");
    } else {
        info!("CONSENSUS - local chain kept at height {length}");
    }
    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        length,
        chain,
    })
}
