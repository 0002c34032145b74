use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dtos::reset_dtos::{
    ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest, ResetPasswordResponse,
    VerifyOtpRequest, VerifyOtpResponse,
};
use crate::errors::{AppError, Result};
use crate::state::AppState;

// 1. Request OTP for password reset
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid_data(e.to_string()))?;

    state.reset_service.request_reset(&payload.phone_number).await?;

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "OTP sent to your phone number for password reset".to_string(),
    }))
}

// 2. Verify OTP, hand back the reset token
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid_data(e.to_string()))?;

    let reset_token = state
        .reset_service
        .verify_otp(&payload.phone_number, &payload.code)
        .await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully for password reset".to_string(),
        reset_token,
    }))
}

// 3. Reset password with the verified token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid_data(e.to_string()))?;

    state
        .reset_service
        .reset_password(&payload.reset_token, &payload.new_password)
        .await?;

    Ok(Json(ResetPasswordResponse {
        success: true,
        message: "Password reset successfully".to_string(),
    }))
}
