//! HTTP front for the [`Aggregator`].
//!
//! The server is started with a public key only. Producers fetch it, post
//! their ciphertexts, and the decrypting party collects the homomorphic
//! total.

use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::info;
use serde::{Deserialize, Serialize};

use crate::ciphertext::Ciphertext;
use crate::keys::PublicKey;
use crate::roles::{Aggregator, Submission};

/// Shared server state: one ledger per process.
pub struct AppState {
    aggregator: Mutex<Aggregator>,
}

impl AppState {
    pub fn new(public_key: PublicKey) -> Self {
        AppState { aggregator: Mutex::new(Aggregator::new(public_key)) }
    }

    // Append-only ledger: a panic mid-request cannot leave it inconsistent.
    fn aggregator(&self) -> MutexGuard<'_, Aggregator> {
        self.aggregator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Incoming submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub producer:   String,
    pub ciphertext: Ciphertext,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub producer:    String,
    pub submissions: usize,
}

/// GET /public-key
async fn get_public_key(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.aggregator().public_key())
}

/// POST /submit
/// { "producer": "...", "ciphertext": { "c": "<base64>", "n": "<base64>" } }
async fn submit(state: web::Data<AppState>, body: web::Json<SubmitRequest>) -> impl Responder {
    let SubmitRequest { producer, ciphertext } = body.into_inner();
    let submission = Submission { producer: producer.clone(), ciphertext };

    match state.aggregator().submit(submission) {
        Ok(submissions) => {
            info!("accepted submission {submissions} from {producer}");
            HttpResponse::Ok().json(SubmitResponse { producer, submissions })
        }
        Err(err) => HttpResponse::BadRequest().body(err.to_string()),
    }
}

/// GET /aggregate
/// Returns `{ count, ciphertext }` or 404 while nothing has been submitted
async fn get_aggregate(state: web::Data<AppState>) -> impl Responder {
    match state.aggregator().encrypted_total() {
        Ok(Some(total)) => HttpResponse::Ok().json(total),
        Ok(None) => HttpResponse::NotFound().body("No submissions yet"),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/public-key", web::get().to(get_public_key))
        .route("/submit", web::post().to(submit))
        .route("/aggregate", web::get().to(get_aggregate));
}

pub async fn run(public_key: PublicKey, host: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(public_key));

    info!("aggregation server listening on {host}:{port}");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}
