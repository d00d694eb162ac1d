use std::path::{Path, PathBuf};

use askama::Template;
use peerstake_user::User;

#[derive(Template)]
#[template(path = "user_space.html")]
struct UserSpaceTemplate<'a> {
    name: &'a str,
    user_id: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Directory {
    Created(String),
    Exists(String),
}

/// Public path a user's directory is served from.
pub fn public_path(user_id: &str) -> String {
    format!("/index/{user_id}")
}

fn directory(root: &Path, user_id: &str) -> PathBuf {
    root.join(user_id)
}

/// Create `{root}/{user id}/index.html` unless the directory already exists.
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn ensure(root: &Path, user: &User) -> anyhow::Result<Directory> {
    let dir = directory(root, &user.id);
    let path = public_path(&user.id);

    if tokio::fs::try_exists(&dir).await? {
        return Ok(Directory::Exists(path));
    }

    let html = UserSpaceTemplate {
        name: user.name(),
        user_id: &user.id,
    }
    .render()?;

    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join("index.html"), html).await?;

    tracing::info!(path = %path, "personal directory created");

    Ok(Directory::Created(path))
}
