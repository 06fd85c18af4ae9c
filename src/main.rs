use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use credit_ledger::api::{self, AppState};
use credit_ledger::config::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env();
    let (host, port) = (settings.host.clone(), settings.port);

    info!(
        "Starting credit ledger API at http://{host}:{port} (difficulty={}, reward={})",
        settings.difficulty, settings.mining_reward
    );

    let state = web::Data::new(AppState::new(settings));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
