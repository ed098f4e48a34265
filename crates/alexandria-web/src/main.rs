use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use alexandria_parsing::CitationParser;
use alexandria_parsing::config_file;
use alexandria_web::AppState;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alexandria=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve configuration: env vars > config file > defaults
    let config_file = match std::env::var("ALEXANDRIA_CONFIG").ok() {
        Some(path) => config_file::read_config(std::path::Path::new(&path))?,
        None => config_file::load_config(),
    };
    let parser = CitationParser::with_config(config_file.to_parsing_config()?);

    let server = config_file.server.unwrap_or_default();
    let host: IpAddr = match std::env::var("HOST").ok().or(server.host) {
        Some(host) => host.parse()?,
        None => IpAddr::from([0, 0, 0, 0]),
    };
    let port: u16 = match std::env::var("PORT").ok() {
        Some(port) => port.parse()?,
        None => server.port.unwrap_or(5001),
    };

    let state = Arc::new(AppState::new(parser));
    let app = alexandria_web::router(state);

    let addr = SocketAddr::new(host, port);
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
