use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let (height, pending) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (bc.len(), bc.pending().len())
    };
    let peers = {
        let registry = state.peers.lock().expect("mutex poisoned");
        registry.len()
    };

    HttpResponse::Ok().json(StatsResponse {
        height,
        pending,
        peers,
        node_id: state.node_id.clone(),
    })
}
