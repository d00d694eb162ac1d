use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::User;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(User::Table)
        .col(
            ColumnDef::new(User::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(User::Email)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(
            ColumnDef::new(User::Username)
                .string()
                .not_null()
                .string_len(50),
        )
        .col(ColumnDef::new(User::Password).string())
        .col(ColumnDef::new(User::DisplayName).string().string_len(100))
        .col(ColumnDef::new(User::Avatar).string())
        .col(ColumnDef::new(User::GithubId).string().string_len(50))
        .col(ColumnDef::new(User::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(User::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(User::Table).to_owned()
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

fn create_unique(name: &str, col: User) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(User::Table)
        .unique()
        .col(col)
        .to_owned()
}

fn drop_unique(name: &str) -> IndexDropStatement {
    Index::drop().name(name).table(User::Table).to_owned()
}

macro_rules! unique_index {
    ($op:ident, $name:literal, $col:expr) => {
        pub struct $op;

        #[async_trait::async_trait]
        impl sqlx_migrator::Operation<sqlx::Sqlite> for $op {
            async fn up(
                &self,
                connection: &mut sqlx::SqliteConnection,
            ) -> Result<(), sqlx_migrator::Error> {
                let statement =
                    create_unique($name, $col).to_string(sea_query::SqliteQueryBuilder);
                sqlx::query(&statement).execute(connection).await?;

                Ok(())
            }

            async fn down(
                &self,
                connection: &mut sqlx::SqliteConnection,
            ) -> Result<(), sqlx_migrator::Error> {
                let statement = drop_unique($name).to_string(sea_query::SqliteQueryBuilder);
                sqlx::query(&statement).execute(connection).await?;

                Ok(())
            }
        }
    };
}

unique_index!(CreateUk1, "uk_user_email", User::Email);
unique_index!(CreateUk2, "uk_user_username", User::Username);
// NULLs never collide in SQLite, so password-only accounts share this index.
unique_index!(CreateUk3, "uk_user_github_id", User::GithubId);
