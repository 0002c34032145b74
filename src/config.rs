// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub afro_api_token: String,
    pub afro_identifier_id: String,
    pub afro_sender: String,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            afro_api_token: env::var("AFRO_API_TOKEN")
                .expect("AFRO_API_TOKEN must be set"),
            afro_identifier_id: env::var("AFRO_IDENTIFIER_ID")
                .unwrap_or_default(),
            afro_sender: env::var("AFRO_SENDER")
                .unwrap_or_else(|_| "AfroMessage".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}
