use clap::Parser;
use railctl_server::{run_server, ApiConfig, ServerArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let args = ServerArgs::parse();
    init_logging();

    if let Err(e) = run_server(ApiConfig::from(args)).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railctl_server=info,railctl_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
