use kvlite::config::Config;
use kvlite::server;
use kvlite::store::new_shared_store;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> kvlite::error::KvResult<()> {
    // Parse command line args
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_args(&args);

    // Initialize tracing; RUST_LOG wins over --loglevel
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.loglevel));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting kvlite v{} with {} initial buckets",
        env!("CARGO_PKG_VERSION"),
        config.initial_capacity
    );

    let store = new_shared_store(config.initial_capacity);
    server::run_server(store, &config).await
}
