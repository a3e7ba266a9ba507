use restaurant_hex::application::order_service::OrderService;
use restaurant_hex::application::reservation_service::ReservationService;
use restaurant_hex::config::Config;
use restaurant_hex::inbound::http::{HttpServer, HttpServerConfig};
use restaurant_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for MONGO_URI / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    // Both failures below end the process with status 1 before anything is served.
    let config = Config::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;
    let repo: Repo = build_repo(Some(&config.mongo_uri))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MongoDB connection failed"))?;

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(
        OrderService::new(repo.clone()),
        ReservationService::new(repo),
        server_cfg,
    )
    .await?;
    http.run().await
}
