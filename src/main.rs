mod api;
mod blockchain;
mod transaction;

use std::env;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use api::AppState;
use blockchain::consensus::HttpPeerClient;
use blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let difficulty: u32 = env::var("DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY)
        .min(MAX_DIFFICULTY);

    let state = web::Data::new(AppState::new(difficulty, Arc::new(HttpPeerClient::new())));

    println!(
        "⛓️ Ledger node {} listening at http://{host}:{port} (difficulty {difficulty})",
        state.node_id
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
