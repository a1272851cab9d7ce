//! Database connection and table setup.
//!
//! Tables are created straight from the entity definitions with
//! `IF NOT EXISTS`, so opening an existing database is a no-op. Schema
//! changes to an existing database are out of scope.

use crate::config::DatabaseConfig;
use crate::models::{Excursion, ExcursionImage, Faq, Review, SiteSettings, SocialLink};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

/// Open a connection pool for the configured URL.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    tracing::debug!(url = %config.url, "connected to database");
    Ok(db)
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Create every table that does not exist yet.
///
/// Parents come before children so foreign keys resolve.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, SiteSettings).await?;
    create_table(db, Excursion).await?;
    create_table(db, ExcursionImage).await?;
    create_table(db, Review).await?;
    create_table(db, Faq).await?;
    create_table(db, SocialLink).await?;
    tracing::debug!("schema ready");
    Ok(())
}
