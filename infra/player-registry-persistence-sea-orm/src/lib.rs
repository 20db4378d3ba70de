use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

pub mod entity;
pub mod players;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://players.db?mode=rwc";

pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub async fn create_db_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    // every connection to an in-memory sqlite database sees its own database
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(5);
    }
    opt.sqlx_logging(false);
    Database::connect(opt).await
}

/// Creates the `players` table unless it already exists.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());
    let mut players_table = schema.create_table_from_entity(entity::player::Entity);
    players_table.if_not_exists();
    db.execute(&players_table).await?;
    Ok(())
}
