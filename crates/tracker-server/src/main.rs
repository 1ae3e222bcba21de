use std::sync::Arc;

use tracker_server::config::loader::load_config;
use tracker_server::observability::{apply_logging_level, init_tracing};
use tracker_server::{ServerBuilder, build_lifecycle, load_dotenv, resolve_config_path};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    load_dotenv();

    // Initialize tracing early with the default level
    init_tracing();

    // Parse config path from CLI, environment, or use default
    let (config_path, source) = resolve_config_path();

    // Load configuration
    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    if !cfg.has_api_key() {
        tracing::warn!("No API key configured (auth.api_key / API_KEY); every GraphQL request will be rejected");
    }

    let level = cfg.logging.level.clone();
    let lifecycle = Arc::new(build_lifecycle(&cfg).with_setup(move || apply_logging_level(&level)));

    // Become ready before accepting connections
    if let Err(e) = lifecycle.ensure_ready().await {
        eprintln!("Gateway initialization failed: {e}");
        std::process::exit(2);
    }

    let server = ServerBuilder::new()
        .with_config(cfg)
        .with_lifecycle(lifecycle)
        .build();

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}
