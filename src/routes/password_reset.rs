use axum::{routing::post, Router};

use crate::{handlers::password_reset, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        // Request OTP for password reset
        .route("/forgot-password", post(password_reset::forgot_password))

        // Verify OTP
        .route("/verify-otp", post(password_reset::verify_otp))

        // Reset password with verified OTP
        .route("/reset-password", post(password_reset::reset_password))
}
