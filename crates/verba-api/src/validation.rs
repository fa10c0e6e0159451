use crate::error::ApiError;
use validator::ValidateLength;

/// Validate a login name.
///
/// Logins are lowercase handles: 4-64 characters, letters, digits and
/// underscores, starting with a letter.
pub fn validate_login(login: &str) -> Result<(), ApiError> {
    if login.is_empty() {
        return Err(ApiError::Validation("Login cannot be empty".to_string()));
    }

    if !login.validate_length(Some(4), Some(64), None) {
        return Err(ApiError::Validation(
            "Login must be between 4 and 64 characters long".to_string(),
        ));
    }

    if !login.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::Validation(
            "Login must start with a lowercase letter".to_string(),
        ));
    }

    if !login
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ApiError::Validation(
            "Login can only contain lowercase letters, digits, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    // bcrypt truncates input beyond 72 bytes
    if password.len() > 72 {
        return Err(ApiError::Validation(
            "Password must be at most 72 characters long".to_string(),
        ));
    }

    // Check for at least one letter and one number
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_number = password.chars().any(|c| c.is_numeric());

    if !has_letter || !has_number {
        return Err(ApiError::Validation(
            "Password must contain at least one letter and one number".to_string(),
        ));
    }

    Ok(())
}

/// Validate an ISO 639-ish language code: 2 or 3 ASCII letters.
///
/// The card endpoints accept these as optional metadata, so only the shape is
/// checked, not membership in the full ISO table.
pub fn validate_language_code(code: &str) -> Result<(), ApiError> {
    if !(2..=3).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::Validation(format!(
            "Invalid language code: '{code}'. Expected a 2- or 3-letter code (e.g., 'en', 'fr')"
        )));
    }

    Ok(())
}

/// Validate a deck name: non-empty after trimming, at most 255 characters.
pub fn validate_deck_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiError::Validation(
            "Deck name cannot be empty".to_string(),
        ));
    }

    if !trimmed.validate_length(None, Some(255), None) {
        return Err(ApiError::Validation(
            "Deck name must be at most 255 characters long".to_string(),
        ));
    }

    Ok(())
}
