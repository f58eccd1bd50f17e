//! Database configuration module.
//!
//! Handles SQLite database connection and table creation using SeaORM.
//! Table creation uses SeaORM's `Schema::create_table_from_entity` method to
//! generate SQL statements from the entity definitions, ensuring the database
//! schema matches the Rust struct definitions without hand-written SQL.

use crate::entities::{Campaign, Contact, Pledge, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local SQLite file.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/donortrack.sqlite".to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on an already-initialized database; existing tables are
/// left untouched.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        schema.create_table_from_entity(Contact),
        schema.create_table_from_entity(Campaign),
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(Pledge),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    Ok(())
}
