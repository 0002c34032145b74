use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, DateTime},
    Collection, Database,
};

use crate::errors::Result;
use crate::models::user::User;

/// The credential store the reset flow runs against.
///
/// Lookups are always by canonical phone number; the only write this flow
/// performs is overwriting a record's password hash.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    /// Overwrite the stored hash. Returns false when no record matched.
    async fn update_password_hash(&self, phone: &str, password_hash: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let user = self.users().find_one(doc! { "phone": phone }).await?;
        Ok(user)
    }

    async fn update_password_hash(&self, phone: &str, password_hash: &str) -> Result<bool> {
        let now = Utc::now();
        let now_bson = DateTime::from_millis(now.timestamp_millis());

        let filter = doc! { "phone": phone };
        let update = doc! {
            "$set": {
                "password_hash": password_hash,
                "updated_at": now_bson,
            }
        };

        let result = self.users().update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }
}
