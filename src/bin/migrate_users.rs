// bin/migrate_users.rs
//
// One-shot cleanup after the move to phone-only accounts: drops the legacy
// email and username fields from existing user documents.
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection,
};

#[tokio::main]
async fn main() -> mongodb::error::Result<()> {
    println!("Starting user schema migration...");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let client_options = ClientOptions::parse(&database_url).await?;
    let client = Client::with_options(client_options)?;
    let db = client.database("authdb");
    let collection: Collection<Document> = db.collection("users");

    let filter = doc! {
        "$or": [
            { "email": { "$exists": true } },
            { "username": { "$exists": true } },
        ]
    };
    let update = doc! {
        "$unset": { "email": "", "username": "" }
    };

    let result = collection.update_many(filter, update).await?;

    println!(
        "Migration complete! Cleaned {} user documents",
        result.modified_count
    );
    Ok(())
}
