mod admin;
mod bootstrap;
mod cli;

use dotenv::dotenv;
use proxy_core::block::BlockSet;
use proxy_core::cache::Cache;
use proxy_core::{Config, Dispatcher, Shared};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = cli::parse_port(std::env::args());
    let config = Config::new(port);

    let blocklist = Arc::new(BlockSet::new());
    bootstrap::load_blocklist(&blocklist, bootstrap::BLOCKLIST_FILE).await;

    let shared = Shared {
        cache: Arc::new(Cache::with_capacity(config.cache_capacity)),
        blocklist: blocklist.clone(),
    };

    let dispatcher = match Dispatcher::bind(&config, shared).await {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            tracing::error!(error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };

    let admin_task = tokio::spawn(admin::run(blocklist, dispatcher.clone()));
    dispatcher.run().await;
    admin_task.abort();
}
