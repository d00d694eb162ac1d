use std::collections::HashMap;

use peerstake_db::table::{PeerGroup, PeerGroupMember, User};
use sea_query::{Expr, ExprTrait, Func, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteExecutor, SqlitePool, prelude::FromRow};

use crate::{Category, MemberSummary};

#[derive(FromRow)]
pub struct PeerGroupRow {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: String,
    pub max_members: i64,
    pub is_public: bool,
    pub category: sqlx::types::Text<Category>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(FromRow)]
pub struct MemberRow {
    pub peer_group_id: String,
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

impl From<MemberRow> for MemberSummary {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
            avatar: row.avatar,
        }
    }
}

fn select() -> sea_query::SelectStatement {
    Query::select()
        .columns([
            (PeerGroup::Table, PeerGroup::Id),
            (PeerGroup::Table, PeerGroup::CreatorId),
            (PeerGroup::Table, PeerGroup::Name),
            (PeerGroup::Table, PeerGroup::Description),
            (PeerGroup::Table, PeerGroup::MaxMembers),
            (PeerGroup::Table, PeerGroup::IsPublic),
            (PeerGroup::Table, PeerGroup::Category),
            (PeerGroup::Table, PeerGroup::CreatedAt),
            (PeerGroup::Table, PeerGroup::UpdatedAt),
        ])
        .from(PeerGroup::Table)
        .to_owned()
}

pub(crate) async fn find(
    executor: impl SqliteExecutor<'_>,
    id: String,
) -> peerstake_shared::Result<Option<PeerGroupRow>> {
    let statement = select()
        .and_where(Expr::col((PeerGroup::Table, PeerGroup::Id)).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PeerGroupRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

pub(crate) async fn list_public(
    pool: &SqlitePool,
    category: Option<Category>,
) -> peerstake_shared::Result<Vec<PeerGroupRow>> {
    let mut statement = select()
        .and_where(Expr::col((PeerGroup::Table, PeerGroup::IsPublic)).eq(true))
        .order_by((PeerGroup::Table, PeerGroup::CreatedAt), Order::Desc)
        .order_by_expr(Expr::cust("peer_group.rowid"), Order::Desc)
        .to_owned();

    if let Some(category) = category {
        statement.and_where(Expr::col((PeerGroup::Table, PeerGroup::Category)).eq(category.to_string()));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PeerGroupRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn list_for_member(
    pool: &SqlitePool,
    user_id: String,
) -> peerstake_shared::Result<Vec<PeerGroupRow>> {
    let statement = select()
        .inner_join(
            PeerGroupMember::Table,
            Expr::col((PeerGroupMember::Table, PeerGroupMember::PeerGroupId))
                .equals((PeerGroup::Table, PeerGroup::Id)),
        )
        .and_where(Expr::col((PeerGroupMember::Table, PeerGroupMember::UserId)).eq(user_id))
        .order_by((PeerGroup::Table, PeerGroup::CreatedAt), Order::Desc)
        .order_by_expr(Expr::cust("peer_group.rowid"), Order::Desc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PeerGroupRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

/// Members of the given groups in join order.
pub(crate) async fn members(
    pool: &SqlitePool,
    group_ids: Vec<String>,
) -> peerstake_shared::Result<Vec<MemberRow>> {
    if group_ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .column((PeerGroupMember::Table, PeerGroupMember::PeerGroupId))
        .columns([
            (User::Table, User::Id),
            (User::Table, User::Username),
            (User::Table, User::DisplayName),
            (User::Table, User::Avatar),
        ])
        .from(PeerGroupMember::Table)
        .inner_join(
            User::Table,
            Expr::col((User::Table, User::Id))
                .equals((PeerGroupMember::Table, PeerGroupMember::UserId)),
        )
        .and_where(Expr::col((PeerGroupMember::Table, PeerGroupMember::PeerGroupId)).is_in(group_ids))
        .order_by((PeerGroupMember::Table, PeerGroupMember::JoinedAt), Order::Asc)
        .order_by_expr(Expr::cust("peer_group_member.rowid"), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, MemberRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn users(
    pool: &SqlitePool,
    ids: impl IntoIterator<Item = String>,
) -> peerstake_shared::Result<HashMap<String, MemberSummary>> {
    let mut ids = ids.into_iter().collect::<Vec<_>>();
    ids.sort();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let statement = Query::select()
        .columns([User::Id, User::Username, User::DisplayName, User::Avatar])
        .from(User::Table)
        .and_where(Expr::col(User::Id).is_in(ids))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, MemberSummary, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|u| (u.id.to_owned(), u)).collect())
}

pub(crate) async fn member_counts(
    pool: &SqlitePool,
    group_ids: Vec<String>,
) -> peerstake_shared::Result<HashMap<String, i64>> {
    if group_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let statement = Query::select()
        .column(PeerGroupMember::PeerGroupId)
        .expr(Func::count(Expr::col(PeerGroupMember::UserId)))
        .from(PeerGroupMember::Table)
        .and_where(Expr::col(PeerGroupMember::PeerGroupId).is_in(group_ids))
        .group_by_col(PeerGroupMember::PeerGroupId)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String, i64), _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().collect())
}

pub(crate) async fn member_count(
    executor: impl SqliteExecutor<'_>,
    group_id: String,
) -> peerstake_shared::Result<i64> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(PeerGroupMember::UserId)))
        .from(PeerGroupMember::Table)
        .and_where(Expr::col(PeerGroupMember::PeerGroupId).eq(group_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

pub(crate) async fn is_member(
    executor: impl SqliteExecutor<'_>,
    group_id: String,
    user_id: String,
) -> peerstake_shared::Result<bool> {
    let statement = Query::select()
        .column(PeerGroupMember::UserId)
        .from(PeerGroupMember::Table)
        .and_where(Expr::col(PeerGroupMember::PeerGroupId).eq(group_id))
        .and_where(Expr::col(PeerGroupMember::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}

pub struct CreateInput {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: String,
    pub max_members: i64,
    pub is_public: bool,
    pub category: Category,
}

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    input: CreateInput,
) -> peerstake_shared::Result<()> {
    let now = peerstake_shared::now();
    let statement = Query::insert()
        .into_table(PeerGroup::Table)
        .columns([
            PeerGroup::Id,
            PeerGroup::CreatorId,
            PeerGroup::Name,
            PeerGroup::Description,
            PeerGroup::MaxMembers,
            PeerGroup::IsPublic,
            PeerGroup::Category,
            PeerGroup::CreatedAt,
            PeerGroup::UpdatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.creator_id.into(),
            input.name.into(),
            input.description.into(),
            input.max_members.into(),
            input.is_public.into(),
            input.category.to_string().into(),
            now.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

pub(crate) async fn add_member(
    executor: impl SqliteExecutor<'_>,
    group_id: String,
    user_id: String,
) -> peerstake_shared::Result<()> {
    let statement = Query::insert()
        .into_table(PeerGroupMember::Table)
        .columns([
            PeerGroupMember::PeerGroupId,
            PeerGroupMember::UserId,
            PeerGroupMember::JoinedAt,
        ])
        .values_panic([
            group_id.into(),
            user_id.into(),
            peerstake_shared::now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

pub(crate) async fn remove_member(
    executor: impl SqliteExecutor<'_>,
    group_id: String,
    user_id: String,
) -> peerstake_shared::Result<()> {
    let statement = Query::delete()
        .from_table(PeerGroupMember::Table)
        .and_where(Expr::col(PeerGroupMember::PeerGroupId).eq(group_id))
        .and_where(Expr::col(PeerGroupMember::UserId).eq(user_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

/// Bump `updated_at` after a membership change.
pub(crate) async fn touch(
    executor: impl SqliteExecutor<'_>,
    group_id: String,
) -> peerstake_shared::Result<()> {
    let statement = Query::update()
        .table(PeerGroup::Table)
        .value(PeerGroup::UpdatedAt, peerstake_shared::now())
        .and_where(Expr::col(PeerGroup::Id).eq(group_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}
