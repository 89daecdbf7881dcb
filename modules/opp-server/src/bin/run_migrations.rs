//! Runs pending SQLx migrations against the record store.
//!
//! Used as a deploy step before starting the server binary, so a bad
//! migration fails the deploy instead of the first request.

use opp_common::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    println!("running database migrations...");

    let pool = opp_store::connect(&config.record_store_url).await?;
    opp_store::run_migrations(&pool).await?;

    println!("migrations completed successfully");

    Ok(())
}
