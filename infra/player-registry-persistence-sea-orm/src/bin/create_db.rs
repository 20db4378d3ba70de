use player_registry_persistence_sea_orm::{create_db_pool, create_schema, database_url};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = database_url();
    let pool = create_db_pool(&url)
        .await
        .expect("Failed to connect to database");

    create_schema(&pool)
        .await
        .expect("Failed to create players table");

    println!("Created database tables successfully");
}
