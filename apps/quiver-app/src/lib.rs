//! # Quiver App Library
//!
//! Command layer for the Quiver surfboard rental cart. The mobile UI bridge
//! calls the functions in [`commands`]; the `quiver` binary uses [`run`] to
//! restore and print the saved cart.
//!
//! ## Module Organization
//! ```text
//! quiver_app/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart state and totals channel
//! │   └── config.rs   ◄─── quiver.toml loading and currency display
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Board lookup
//! │   └── cart.rs     ◄─── Cart manipulation and rehydration
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration
//! 3. Connect to database & run migrations
//! 4. Create state objects (DbState, CartState, ConfigState)
//! 5. Rehydrate the saved cart

use std::path::PathBuf;

use quiver_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod state;

use state::{AppConfig, CartState, ConfigState, DbState};

/// Runs the CLI: restores the saved cart and prints it as JSON.
///
/// ## Arguments
/// - `--config <PATH>`: read this file instead of the platform default
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load(config_path_from_args())?;
    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(path = %db_path.display(), "Opening database");
    let db = DbState::new(Database::new(DbConfig::new(&db_path)).await?);
    let cart = CartState::new(config.delivery_policy());
    let config = ConfigState::new(config);

    let hydrated = commands::cart::hydrate_cart(&db, &cart, &config).await?;
    if !hydrated.dropped.is_empty() {
        warn!(
            count = hydrated.dropped.len(),
            "Some saved rentals are no longer available"
        );
    }

    println!("{}", serde_json::to_string_pretty(&hydrated)?);

    db.inner().close().await;
    Ok(())
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only the cart JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quiver=trace` - Show trace for quiver crates only
/// - Default: INFO level, debug for quiver crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quiver=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
