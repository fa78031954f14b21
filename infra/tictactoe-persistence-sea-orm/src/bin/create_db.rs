use tictactoe_persistence_sea_orm::{Store, StoreConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env();
    let store = Store::connect(&config)
        .await
        .expect("Failed to connect to database");

    store
        .create_schema()
        .await
        .expect("Failed to create database tables");

    println!("Created database tables in {}", config.database_url);
}
