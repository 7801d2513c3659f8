use nc_news::{run_app, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nc_news=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Invalid configuration: {:#}", error);
            std::process::exit(1);
        }
    };
    if let Err(error) = run_app(config).await {
        tracing::error!("Server error: {:#}", error);
        std::process::exit(1);
    }
}
