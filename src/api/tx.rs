use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};

/// Queue a transaction for the next mined block. Field presence is enforced
/// here at the boundary; the core never validates payloads.
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let body = body.into_inner();
    if body.sender.trim().is_empty() || body.receiver.trim().is_empty() {
        return HttpResponse::BadRequest().body("sender and receiver are required");
    }

    let index = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.add_transaction(body.sender, body.receiver, body.amount)
    };

    info!("TX - queued for block {index}");
    HttpResponse::Created().json(NewTxResponse {
        message: format!("transaction will be added to block {index}"),
        index,
    })
}

/// List the pending pool.
#[get("/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: bc.pending().len(),
        transactions: bc.pending().to_vec(),
    })
}
