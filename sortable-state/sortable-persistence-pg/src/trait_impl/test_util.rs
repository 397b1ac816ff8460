use sea_orm::{ConnectOptions, Database};
use sortable_migration::{Migrator, MigratorTrait};

use crate::db::PostgresStateDb;

/// The sea-orm code paths against an in-memory SQLite database.
/// One pooled connection, otherwise every connection sees its own database.
pub(crate) async fn memory_db() -> PostgresStateDb {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(opt).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();

    PostgresStateDb::from_connection(conn)
}
