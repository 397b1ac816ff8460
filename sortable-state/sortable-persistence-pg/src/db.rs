use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sortable_common::{
    error::Error,
    state::{BaseDbTrait, DatabaseTrait},
};

use crate::mapping::db_error_to_domain;

#[derive(Debug, Clone)]
pub struct PostgresStateDb {
    pub(crate) conn: DatabaseConnection,
}

impl PostgresStateDb {
    pub async fn new(db_url: &str) -> Result<Self, Error> {
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {e}")))?;

        Ok(Self { conn })
    }

    /// Wraps an already open connection, e.g. one the
    /// migrator has just run against.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[async_trait]
impl BaseDbTrait for PostgresStateDb {
    async fn ping(&self) -> Result<(), Error> {
        self.conn.ping().await.map_err(db_error_to_domain)
    }
}

/// Implements the [DatabaseTrait] for [PostgresStateDb]
/// This is a wrapper trait around the scope and
/// position traits, so the server can hold the
/// store behind one `Arc<dyn DatabaseTrait>`.
impl DatabaseTrait for PostgresStateDb {}
