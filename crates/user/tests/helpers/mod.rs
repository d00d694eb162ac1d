use std::{path::PathBuf, str::FromStr};

use peerstake_shared::State;
use peerstake_user::{Command, RegisterInput, User};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    peerstake_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State::single(pool))
}

#[allow(dead_code)]
pub async fn create_user(cmd: &Command, name: impl Into<String>) -> anyhow::Result<User> {
    let name = name.into();

    Ok(cmd
        .register(RegisterInput {
            email: format!("{name}@peerstake.localhost"),
            username: name,
            password: "my_password".to_owned(),
        })
        .await?)
}
