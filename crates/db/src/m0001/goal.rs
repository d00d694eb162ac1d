use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Goal;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Goal::Table)
        .col(
            ColumnDef::new(Goal::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Goal::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(Goal::PeerGroupId).string().string_len(26))
        .col(
            ColumnDef::new(Goal::Title)
                .string()
                .not_null()
                .string_len(100),
        )
        .col(
            ColumnDef::new(Goal::Description)
                .string()
                .not_null()
                .string_len(500),
        )
        .col(ColumnDef::new(Goal::Deadline).big_integer().not_null())
        .col(ColumnDef::new(Goal::StakeAmount).double().not_null())
        .col(
            ColumnDef::new(Goal::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(Goal::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Goal::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Goal::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_goal_user_id")
        .table(Goal::Table)
        .col(Goal::UserId)
        .col(Goal::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_goal_user_id")
        .table(Goal::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
