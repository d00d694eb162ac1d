use std::collections::HashMap;

use peerstake_db::table::{Goal, PeerGroup};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::GoalStatus;

#[derive(FromRow)]
pub struct GoalRow {
    pub id: String,
    pub user_id: String,
    pub peer_group_id: Option<String>,
    pub title: String,
    pub description: String,
    pub deadline: i64,
    pub stake_amount: f64,
    pub status: sqlx::types::Text<GoalStatus>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn select() -> sea_query::SelectStatement {
    Query::select()
        .columns([
            Goal::Id,
            Goal::UserId,
            Goal::PeerGroupId,
            Goal::Title,
            Goal::Description,
            Goal::Deadline,
            Goal::StakeAmount,
            Goal::Status,
            Goal::CreatedAt,
            Goal::UpdatedAt,
        ])
        .from(Goal::Table)
        .to_owned()
}

pub(crate) async fn list(pool: &SqlitePool, user_id: String) -> peerstake_shared::Result<Vec<GoalRow>> {
    let statement = select()
        .and_where(Expr::col(Goal::UserId).eq(user_id))
        .order_by(Goal::CreatedAt, Order::Desc)
        .order_by_expr(Expr::cust("goal.rowid"), Order::Desc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, GoalRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn find(
    pool: &SqlitePool,
    user_id: String,
    id: String,
) -> peerstake_shared::Result<Option<GoalRow>> {
    let statement = select()
        .and_where(Expr::col(Goal::Id).eq(id))
        .and_where(Expr::col(Goal::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, GoalRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn peer_group_exists(
    pool: &SqlitePool,
    id: String,
) -> peerstake_shared::Result<bool> {
    let statement = Query::select()
        .column(PeerGroup::Id)
        .from(PeerGroup::Table)
        .and_where(Expr::col(PeerGroup::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Names of the given peer groups keyed by id. Unknown ids are skipped.
pub(crate) async fn peer_group_names(
    pool: &SqlitePool,
    ids: impl IntoIterator<Item = String>,
) -> peerstake_shared::Result<HashMap<String, String>> {
    let mut ids = ids.into_iter().collect::<Vec<_>>();
    ids.sort();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let statement = Query::select()
        .columns([PeerGroup::Id, PeerGroup::Name])
        .from(PeerGroup::Table)
        .and_where(Expr::col(PeerGroup::Id).is_in(ids))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String, String), _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().collect())
}

pub struct CreateInput {
    pub id: String,
    pub user_id: String,
    pub peer_group_id: Option<String>,
    pub title: String,
    pub description: String,
    pub deadline: i64,
    pub stake_amount: f64,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> peerstake_shared::Result<()> {
    let now = peerstake_shared::now();
    let statement = Query::insert()
        .into_table(Goal::Table)
        .columns([
            Goal::Id,
            Goal::UserId,
            Goal::PeerGroupId,
            Goal::Title,
            Goal::Description,
            Goal::Deadline,
            Goal::StakeAmount,
            Goal::Status,
            Goal::CreatedAt,
            Goal::UpdatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.user_id.into(),
            input.peer_group_id.into(),
            input.title.into(),
            input.description.into(),
            input.deadline.into(),
            input.stake_amount.into(),
            GoalStatus::Active.to_string().into(),
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
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<i64>,
    pub status: Option<GoalStatus>,
}

pub(crate) async fn update(pool: &SqlitePool, input: UpdateInput) -> peerstake_shared::Result<()> {
    let mut statement = Query::update()
        .table(Goal::Table)
        .value(Goal::UpdatedAt, peerstake_shared::now())
        .and_where(Expr::col(Goal::Id).eq(input.id))
        .to_owned();

    if let Some(title) = input.title {
        statement.value(Goal::Title, title);
    }

    if let Some(description) = input.description {
        statement.value(Goal::Description, description);
    }

    if let Some(deadline) = input.deadline {
        statement.value(Goal::Deadline, deadline);
    }

    if let Some(status) = input.status {
        statement.value(Goal::Status, status.to_string());
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Delete an active goal owned by `user_id`. Returns false when nothing
/// matched.
pub(crate) async fn delete_active(
    pool: &SqlitePool,
    user_id: String,
    id: String,
) -> peerstake_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(Goal::Table)
        .and_where(Expr::col(Goal::Id).eq(id))
        .and_where(Expr::col(Goal::UserId).eq(user_id))
        .and_where(Expr::col(Goal::Status).eq(GoalStatus::Active.to_string()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}
