use sea_orm::{
    ConnectOptions, Database, DatabaseConnection,
    sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous},
};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

/// Pool options for the catalogue database. The SQLite settings are part of
/// the connect options so every pooled connection enforces foreign keys.
pub fn connect_options(database_url: &str) -> ConnectOptions {
    let mut opts = ConnectOptions::new(database_url);
    opts.map_sqlx_sqlite_opts(|sqlite| {
        sqlite
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
    });
    opts
}

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    connect_with(connect_options(database_url)).await
}

async fn connect_with(opts: ConnectOptions) -> AppResult<DatabaseConnection> {
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
