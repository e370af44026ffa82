//! # Quiver CLI Entry Point
//!
//! Restores the saved rental cart and prints it, priced, as JSON.
//!
//! ## Usage
//! ```bash
//! quiver                      # platform config and database
//! quiver --config ./dev.toml  # explicit config file
//! QUIVER_DB_PATH=./quiver_dev.db quiver
//! ```
//!
//! The setup lives in lib.rs so the commands stay testable.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    quiver_app::run().await
}
