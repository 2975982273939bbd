use estate_exchange::{Marketplace, MarketplaceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Estate Exchange - order book and settlement engine for tokenized real estate

USAGE:
    estate-exchange [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 8080)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults
    estate-exchange

    # Run with config file
    estate-exchange --config marketplace.json

    # Run with custom port
    PORT=9000 estate-exchange
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estate_exchange=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path);
        let config = MarketplaceConfig::from_file(&path)?;
        tracing::info!("Marketplace: {}", config.name);
        tracing::info!("Assets: {}", config.assets.len());
        tracing::info!("Participants: {}", config.participants.len());
        tracing::info!("Seed orders: {}", config.seed_orders.len());
        config
    } else {
        tracing::info!("Using default configuration");
        MarketplaceConfig::default()
    };

    // Environment overrides
    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT")
        && let Ok(port) = port.parse()
    {
        config.server.port = port;
    }

    let marketplace = Marketplace::new(config);

    tracing::info!("Starting Estate Exchange");
    tracing::info!(
        "REST API: http://{}:{}/api/v1/",
        marketplace.config.server.host,
        marketplace.config.server.port
    );
    tracing::info!(
        "Admin API: http://{}:{}/admin/",
        marketplace.config.server.host,
        marketplace.config.server.port
    );
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /api/v1/assets");
    tracing::info!("  GET  /api/v1/depth?asset=BRK-TOWER-A&levels=10");
    tracing::info!("  POST /api/v1/orders");
    tracing::info!("  GET  /api/v1/trades?asset=BRK-TOWER-A");
    tracing::info!("  GET  /api/v1/holdings/{{address}}");
    tracing::info!("  POST /admin/distributions");

    marketplace.run().await
}
