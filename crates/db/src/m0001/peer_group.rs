use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::PeerGroup;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(PeerGroup::Table)
        .col(
            ColumnDef::new(PeerGroup::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(PeerGroup::CreatorId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(PeerGroup::Name)
                .string()
                .not_null()
                .string_len(50),
        )
        .col(
            ColumnDef::new(PeerGroup::Description)
                .string()
                .not_null()
                .string_len(500),
        )
        .col(
            ColumnDef::new(PeerGroup::MaxMembers)
                .integer()
                .not_null()
                .default(5),
        )
        .col(
            ColumnDef::new(PeerGroup::IsPublic)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(PeerGroup::Category)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(PeerGroup::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(PeerGroup::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(PeerGroup::Table).to_owned()
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
        .name("idx_peer_group_is_public")
        .table(PeerGroup::Table)
        .col(PeerGroup::IsPublic)
        .col(PeerGroup::Category)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_peer_group_is_public")
        .table(PeerGroup::Table)
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
