//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::error::EMPTY_GUESS_MESSAGE;

/// Validates that a guess names something, i.e. is not blank once trimmed.
///
/// # Examples
///
/// ```ignore
/// validate_guess_text("Pitbull") // Ok
/// validate_guess_text("   ")     // Err
/// ```
pub fn validate_guess_text(guess: &str) -> Result<(), ValidationError> {
    if guess.trim().is_empty() {
        let mut err = ValidationError::new("guess_blank");
        err.message = Some(EMPTY_GUESS_MESSAGE.into());
        return Err(err);
    }

    Ok(())
}
