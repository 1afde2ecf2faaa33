//! Persistence layer.
//!
//! Each table gets a `Query` (reads) and a `Mutation` (writes) namespace.
//! Functions are generic over [`ConnectionTrait`](sea_orm::ConnectionTrait)
//! so they run equally on a pooled connection or inside a transaction.
//! Multi-table writes open their own transaction.

pub mod category;
pub mod contact;
pub mod entity;
pub mod quiz;
pub mod schema;
pub mod score;
pub mod session;
pub mod user;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

pub use sea_orm;

fn build_connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.sql_logging);
    options
}

/// Open the connection pool and, when configured, create missing tables.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(build_connect_options(config)).await?;
    tracing::info!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "Database connected"
    );

    if config.create_schema {
        schema::create_schema(&db).await?;
    }
    Ok(db)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, EntityTrait, PaginatorTrait};

    use super::*;

    #[tokio::test]
    async fn test_connect_creates_schema() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let db = connect(&config).await.unwrap();

        assert_eq!(db.get_database_backend(), DatabaseBackend::Sqlite);
        assert_eq!(entity::quiz::Entity::find().count(&db).await.unwrap(), 0);
    }
}
