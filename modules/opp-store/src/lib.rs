//! Postgres-backed persistence for opportunities, matches, and scraper
//! run audit rows. Each table gets its own thin gateway; none of them
//! share a transaction, matching the store's documented convergence
//! guarantees rather than stronger cross-table consistency.

mod matches;
mod opportunities;
mod row;
mod runs;

pub use matches::MatchStore;
pub use opportunities::{OpportunityFilter, OpportunityStore, UpsertKind, UpsertOutcome};
pub use runs::ScraperRunStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
