use crate::errors::{AppError, Result};

/// Local Ethiopian format: 09XXXXXXXX
const LOCAL_PREFIX: &str = "09";
/// International format: +251XXXXXXXXX
const INTL_PREFIX: &str = "+251";

/// Collapse an accepted phone number into the canonical +251XXXXXXXXX form.
///
/// Accepts 09XXXXXXXX or +251XXXXXXXXX. Normalization is idempotent, so a
/// value that is already canonical passes through unchanged. Everything else
/// is rejected before any lookup or SMS send happens.
pub fn normalize_phone_number(phone: &str) -> Result<String> {
    let phone = phone.trim();

    if let Some(rest) = phone.strip_prefix(INTL_PREFIX) {
        if rest.len() == 9 && rest.chars().all(|c| c.is_ascii_digit()) {
            return Ok(phone.to_string());
        }
    } else if let Some(rest) = phone.strip_prefix(LOCAL_PREFIX) {
        if rest.len() == 8 && rest.chars().all(|c| c.is_ascii_digit()) {
            // 09XXXXXXXX -> +2519XXXXXXXX
            return Ok(format!("{}{}", INTL_PREFIX, &phone[1..]));
        }
    }

    Err(AppError::invalid_data(
        "Invalid phone number format. Use 09XXXXXXXX or +251XXXXXXXXX format.",
    ))
}
