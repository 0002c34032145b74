use mongodb::{Client, Database};

const DB_NAME: &str = "authdb";

pub async fn get_db_client(database_url: &str) -> Database {
    let client = Client::with_uri_str(database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(DB_NAME);

    // Verify database exists by listing collections
    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!("✅ Connected to database: {}", DB_NAME);

            if !collections.contains(&"users".to_string()) {
                tracing::warn!("'users' collection not found in database");
            }
        }
        Err(e) => {
            tracing::error!(
                "Database '{}' may not exist or is inaccessible: {}",
                DB_NAME,
                e
            );
        }
    }

    db
}
