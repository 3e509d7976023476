//! geopin CLI entry point
//!
//! Reverse geocoding and an interactive headless map session

use geopin::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
