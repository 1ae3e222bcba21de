pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use crate::config::{AppConfig, AuthConfig, LoggingConfig, RegistryConfig, ServerConfig};
pub use crate::observability::{init_tracing, init_tracing_to_stderr};
pub use crate::server::{ServerBuilder, TrackerServer, build_app, build_lifecycle};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From TRACKER_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (tracker.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (TRACKER_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: TRACKER_CONFIG
/// 3. Default: tracker.toml
pub fn resolve_config_path() -> (String, ConfigSource) {
    // 1. Check CLI: --config <path>
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    // 2. Check environment variable
    if let Ok(path) = std::env::var("TRACKER_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    // 3. Default to tracker.toml
    (
        crate::config::loader::DEFAULT_CONFIG_PATH.to_string(),
        ConfigSource::Default,
    )
}

/// Load `.env` if present. A missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }
}
