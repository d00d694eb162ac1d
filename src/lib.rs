pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod github;
pub mod observability;
pub mod routes;
pub mod user_space;

pub use config::Config;
pub use db::{create_pool, create_read_pool, create_write_pool};
pub use routes::{AppState, router};

use sqlx::SqlitePool;
use sqlx_migrator::{Migrate, Plan};

/// Apply all pending schema migrations.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    peerstake_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}
