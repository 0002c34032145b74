use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};

use crate::errors::{AppError, Result};
use crate::repository::user_repo::CredentialStore;
use crate::services::otp::OtpProvider;
use crate::services::phone::normalize_phone_number;
use crate::services::reset_token::ResetTokenService;

const OTP_CODE_LEN: usize = 6;
const MIN_PASSWORD_LEN: usize = 8;

/// Orchestrates the four-step reset flow: request -> OTP sent -> verified
/// (reset token in hand) -> password overwritten.
///
/// No per-request state lives here. Progress through the flow is carried by
/// the reset token itself plus whatever pending-code state the OTP provider
/// keeps, so a still-valid token can be replayed until it expires.
pub struct PasswordResetService {
    store: Arc<dyn CredentialStore>,
    otp: Arc<dyn OtpProvider>,
    tokens: ResetTokenService,
}

impl PasswordResetService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        otp: Arc<dyn OtpProvider>,
        tokens: ResetTokenService,
    ) -> Self {
        Self { store, otp, tokens }
    }

    /// Step 1: look the account up and have the provider deliver a code.
    pub async fn request_reset(&self, phone: &str) -> Result<()> {
        let phone = normalize_phone_number(phone)?;

        self.store
            .find_by_phone(&phone)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.otp.send_code(&phone).await?;
        tracing::info!("Password reset OTP requested for {}", phone);

        Ok(())
    }

    /// Step 2: check the submitted code with the provider and mint the reset
    /// token. This is the only place a reset token is created.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<String> {
        let phone = normalize_phone_number(phone)?;

        if code.len() != OTP_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid_data("OTP code must be 6 digits"));
        }

        self.store
            .find_by_phone(&phone)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !self.otp.verify_code(&phone, code).await? {
            tracing::warn!("OTP verification failed for {}", phone);
            return Err(AppError::OtpInvalid);
        }

        self.tokens.mint(&phone)
    }

    /// Step 3: validate the token and overwrite the stored hash.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid_data(
                "Password must be at least 8 characters long",
            ));
        }

        let phone = self.tokens.validate(token)?;

        // Should not happen for a freshly minted token, but the account can
        // disappear within the token's 10-minute window.
        self.store
            .find_by_phone(&phone)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let password_hash = hash(new_password, DEFAULT_COST)?;

        if !self.store.update_password_hash(&phone, &password_hash).await? {
            return Err(AppError::UserNotFound);
        }

        tracing::info!("Password reset completed for {}", phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use mongodb::bson::oid::ObjectId;
    use serde::Serialize;

    use crate::models::user::User;

    const SECRET: &str = "test-secret";
    const SENT_CODE: &str = "123456";

    struct InMemoryStore {
        users: Mutex<HashMap<String, User>>,
    }

    impl InMemoryStore {
        fn with_user(phone: &str) -> Self {
            let user = User {
                _id: Some(ObjectId::new()),
                phone: phone.to_string(),
                first_name: "Abebe".to_string(),
                last_name: "Kebede".to_string(),
                password_hash: "old-hash".to_string(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            let mut users = HashMap::new();
            users.insert(phone.to_string(), user);
            Self {
                users: Mutex::new(users),
            }
        }

        fn empty() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
            }
        }

        fn password_hash(&self, phone: &str) -> String {
            self.users.lock().unwrap()[phone].password_hash.clone()
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryStore {
        async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
            Ok(self.users.lock().unwrap().get(phone).cloned())
        }

        async fn update_password_hash(&self, phone: &str, password_hash: &str) -> Result<bool> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(phone) {
                Some(user) => {
                    user.password_hash = password_hash.to_string();
                    user.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Accepts one fixed code and records every delivery.
    struct FixedCodeProvider {
        sent_to: Mutex<Vec<String>>,
    }

    impl FixedCodeProvider {
        fn new() -> Self {
            Self {
                sent_to: Mutex::new(Vec::new()),
            }
        }

        fn deliveries(&self) -> usize {
            self.sent_to.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OtpProvider for FixedCodeProvider {
        async fn send_code(&self, phone: &str) -> Result<()> {
            self.sent_to.lock().unwrap().push(phone.to_string());
            Ok(())
        }

        async fn verify_code(&self, _phone: &str, code: &str) -> Result<bool> {
            Ok(code == SENT_CODE)
        }
    }

    fn service(
        store: Arc<InMemoryStore>,
        otp: Arc<FixedCodeProvider>,
    ) -> PasswordResetService {
        PasswordResetService::new(store, otp, ResetTokenService::new(SECRET.to_string()))
    }

    #[tokio::test]
    async fn full_flow_replaces_the_stored_hash() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store.clone(), otp.clone());

        svc.request_reset("0912345678").await.unwrap();
        assert_eq!(otp.deliveries(), 1);

        let token = svc.verify_otp("0912345678", "123456").await.unwrap();
        svc.reset_password(&token, "newsecurepassword123")
            .await
            .unwrap();

        let hash = store.password_hash("+251912345678");
        assert_ne!(hash, "old-hash");
        assert!(bcrypt::verify("newsecurepassword123", &hash).unwrap());
    }

    #[tokio::test]
    async fn valid_token_can_be_replayed_before_expiry() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store.clone(), otp);

        let token = svc.verify_otp("0912345678", "123456").await.unwrap();
        svc.reset_password(&token, "newsecurepassword123")
            .await
            .unwrap();

        // Reuse within the window is allowed; the token carries no consumed
        // state. Last write wins.
        svc.reset_password(&token, "anotherpassword456")
            .await
            .unwrap();

        let hash = store.password_hash("+251912345678");
        assert!(bcrypt::verify("anotherpassword456", &hash).unwrap());
    }

    #[tokio::test]
    async fn wrong_code_is_rejected() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp);

        let result = svc.verify_otp("0912345678", "000000").await;
        assert!(matches!(result, Err(AppError::OtpInvalid)));
    }

    #[tokio::test]
    async fn malformed_code_never_reaches_the_provider() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp);

        for bad in ["12345", "1234567", "12345a", ""] {
            let result = svc.verify_otp("0912345678", bad).await;
            assert!(matches!(result, Err(AppError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn unknown_phone_is_not_found() {
        let store = Arc::new(InMemoryStore::empty());
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp.clone());

        let result = svc.request_reset("0912345678").await;
        assert!(matches!(result, Err(AppError::UserNotFound)));
        assert_eq!(otp.deliveries(), 0);

        let result = svc.verify_otp("0912345678", "123456").await;
        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn both_surface_formats_reach_the_same_account() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp.clone());

        svc.request_reset("0912345678").await.unwrap();
        svc.request_reset("+251912345678").await.unwrap();
        assert_eq!(otp.deliveries(), 2);
    }

    #[tokio::test]
    async fn short_password_fails_regardless_of_token_validity() {
        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp);

        let token = svc.verify_otp("0912345678", "123456").await.unwrap();
        let result = svc.reset_password(&token, "short").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        // The length check also wins over a garbage token.
        let result = svc.reset_password("not-a-token", "short").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn token_minted_for_another_purpose_is_rejected() {
        #[derive(Serialize)]
        struct ForeignClaims {
            sub: String,
            purpose: String,
            iat: usize,
            exp: usize,
        }

        let store = Arc::new(InMemoryStore::with_user("+251912345678"));
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp);

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::default(),
            &ForeignClaims {
                sub: "+251912345678".to_string(),
                purpose: "account-activation".to_string(),
                iat: now as usize,
                exp: (now + 600) as usize,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = svc.reset_password(&token, "newsecurepassword123").await;
        assert!(matches!(result, Err(AppError::TokenPurposeMismatch)));
    }

    #[tokio::test]
    async fn vanished_account_is_not_found_at_reset_time() {
        let store = Arc::new(InMemoryStore::empty());
        let otp = Arc::new(FixedCodeProvider::new());
        let svc = service(store, otp);

        // A structurally valid token whose subject no longer has a record.
        let token = ResetTokenService::new(SECRET.to_string())
            .mint("+251912345678")
            .unwrap();

        let result = svc.reset_password(&token, "newsecurepassword123").await;
        assert!(matches!(result, Err(AppError::UserNotFound)));
    }
}
