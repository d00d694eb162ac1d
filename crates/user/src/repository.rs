use peerstake_db::table::User;
use sea_query::{Cond, Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub github_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub enum FindType {
    Id(String),
    Email(String),
    GithubId(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> peerstake_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            User::Id,
            User::Email,
            User::Username,
            User::Password,
            User::DisplayName,
            User::Avatar,
            User::GithubId,
            User::CreatedAt,
            User::UpdatedAt,
        ])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(User::Email).eq(email)),
        FindType::GithubId(github_id) => {
            statement.and_where(Expr::col(User::GithubId).eq(github_id))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn exists_with_email_or_username(
    pool: &SqlitePool,
    email: impl Into<String>,
    username: impl Into<String>,
) -> peerstake_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .cond_where(
            Cond::any()
                .add(Expr::col(User::Email).eq(email.into()))
                .add(Expr::col(User::Username).eq(username.into())),
        )
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub(crate) async fn is_username_exists(
    pool: &SqlitePool,
    username: impl Into<String>,
) -> peerstake_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Username).eq(username.into()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub struct CreateInput {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub github_id: Option<String>,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> peerstake_shared::Result<()> {
    let now = peerstake_shared::now();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Id,
            User::Email,
            User::Username,
            User::Password,
            User::DisplayName,
            User::Avatar,
            User::GithubId,
            User::CreatedAt,
            User::UpdatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.email.into(),
            input.username.into(),
            input.password.into(),
            input.display_name.into(),
            input.avatar.into(),
            input.github_id.into(),
            now.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub struct UpdateInput {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

pub(crate) async fn update(pool: &SqlitePool, input: UpdateInput) -> peerstake_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .value(User::UpdatedAt, peerstake_shared::now())
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(username) = input.username {
        statement.value(User::Username, username);
    }

    if let Some(display_name) = input.display_name {
        statement.value(User::DisplayName, display_name);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
