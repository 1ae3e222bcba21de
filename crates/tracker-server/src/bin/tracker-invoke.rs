//! Single-invocation entry point.
//!
//! Reads one JSON event per line from stdin and writes one JSON response per
//! line to stdout. The gateway stays warm for the lifetime of the process.
//! Logs go to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracker_graphql::InvocationHandler;
use tracker_server::config::loader::load_config;
use tracker_server::{build_lifecycle, init_tracing_to_stderr, load_dotenv, resolve_config_path};

#[tokio::main]
async fn main() {
    load_dotenv();

    let (config_path, _source) = resolve_config_path();
    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Logging is set up by the first initialization attempt
    let level = cfg.logging.level.clone();
    let lifecycle = build_lifecycle(&cfg).with_setup(move || init_tracing_to_stderr(&level));
    let handler = InvocationHandler::new(Arc::new(lifecycle));

    if let Err(e) = serve(handler).await {
        eprintln!("Invocation loop error: {e}");
        std::process::exit(1);
    }
}

async fn serve(handler: InvocationHandler) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle_json(&line).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}
