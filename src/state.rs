use std::sync::Arc;
use mongodb::Database;

use crate::config::AppConfig;
use crate::repository::user_repo::UserRepository;
use crate::services::otp::AfroMessageClient;
use crate::services::password_reset::PasswordResetService;
use crate::services::reset_token::ResetTokenService;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub reset_service: Arc<PasswordResetService>,
}

impl AppState {
    pub fn new(db: Database, config: &AppConfig) -> Self {
        let store = Arc::new(UserRepository::new(db.clone()));
        let otp = Arc::new(AfroMessageClient::new(
            config.afro_api_token.clone(),
            config.afro_identifier_id.clone(),
            config.afro_sender.clone(),
        ));
        let tokens = ResetTokenService::new(config.jwt_secret.clone());

        AppState {
            db,
            reset_service: Arc::new(PasswordResetService::new(store, otp, tokens)),
        }
    }
}
