//! Ban relay entry point
//!
//! Run with:
//! ```bash
//! cargo run -p relay-server
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use relay_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        server = %config.server.name,
        admin = %config.admin.address(),
        "Configuration loaded"
    );

    if let Err(e) = relay_server::run(config).await {
        error!(error = %e, "Ban relay failed");
        std::process::exit(1);
    }
}
