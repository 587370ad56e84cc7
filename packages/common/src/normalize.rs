//! Canonical forms for the identifying fields of a student record.
//!
//! Every write path and every comparison goes through these functions, so two
//! values are considered equal exactly when their canonical forms are equal.

use thiserror::Error;

/// Number of digits in a national identification number.
pub const NATIONAL_ID_LEN: usize = 12;

/// Trim, collapse internal whitespace runs to a single space and uppercase.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Trim and uppercase an exam identification number.
pub fn normalize_sbd(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Trim free text such as school or subject names.
pub fn normalize_free_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Keep only the ASCII digits of a national ID.
pub fn national_id_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NationalIdError {
    #[error("National ID must contain 12 digits, got {digits}")]
    TooShort { digits: usize },
}

/// Canonical national ID for lookup input.
///
/// Non-digits are stripped and the result is capped at [`NATIONAL_ID_LEN`]
/// digits. Input with fewer digits is rejected rather than padded.
pub fn canonical_national_id(raw: &str) -> Result<String, NationalIdError> {
    let digits = national_id_digits(raw);
    if digits.len() < NATIONAL_ID_LEN {
        return Err(NationalIdError::TooShort {
            digits: digits.len(),
        });
    }
    Ok(digits[..NATIONAL_ID_LEN].to_string())
}
