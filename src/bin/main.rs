use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "vote-server")]
#[command(about = "Movie voting API server", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "vote-server.yaml")]
    config: String,

    /// Emit JSON-formatted logs (also enabled by JSON_LOG=true).
    #[arg(long)]
    json_log: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let json_log = args.json_log
        || std::env::var("JSON_LOG")
            .map(|v| v == "true")
            .unwrap_or(false);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vote_api=info,tower_http=info".into());

    if json_log {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = vote_api::run(&args.config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
