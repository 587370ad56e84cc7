use thiserror::Error;

use crate::award::Award;
use crate::normalize::{
    NATIONAL_ID_LEN, national_id_digits, normalize_free_text, normalize_name, normalize_sbd,
};

/// A student record as entered by an administrator or read from a spreadsheet,
/// before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    pub full_name: String,
    pub sbd: String,
    pub cccd: String,
    pub school: String,
    pub subject: String,
    pub score: f64,
    pub award: Award,
}

/// A student record in canonical form, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub full_name: String,
    pub sbd: String,
    pub cccd: String,
    pub school: String,
    pub subject: String,
    pub score: f64,
    pub award: Award,
}

/// Structural problems that keep a record out of the roster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Full name must not be empty")]
    MissingName,
    #[error("Exam ID must not be empty")]
    MissingExamId,
    #[error("National ID must contain exactly 12 digits, got {digits}")]
    InvalidNationalId { digits: usize },
    #[error("Score must be a non-negative number, got {value}")]
    InvalidScore { value: f64 },
}

impl FieldError {
    /// Stable machine-readable name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::MissingExamId => "missing_exam_id",
            Self::InvalidNationalId { .. } => "invalid_national_id",
            Self::InvalidScore { .. } => "invalid_score",
        }
    }
}

impl StudentDraft {
    /// Canonicalize every field and enforce the structural rules.
    ///
    /// Unlike lookup input, a stored national ID must have exactly
    /// [`NATIONAL_ID_LEN`] digits; longer values are rejected, not truncated.
    pub fn normalize(self) -> Result<StudentFields, FieldError> {
        let full_name = normalize_name(&self.full_name);
        if full_name.is_empty() {
            return Err(FieldError::MissingName);
        }

        let sbd = normalize_sbd(&self.sbd);
        if sbd.is_empty() {
            return Err(FieldError::MissingExamId);
        }

        let cccd = national_id_digits(&self.cccd);
        if cccd.len() != NATIONAL_ID_LEN {
            return Err(FieldError::InvalidNationalId { digits: cccd.len() });
        }

        if !self.score.is_finite() || self.score < 0.0 {
            return Err(FieldError::InvalidScore { value: self.score });
        }

        Ok(StudentFields {
            full_name,
            sbd,
            cccd,
            school: normalize_free_text(&self.school),
            subject: normalize_free_text(&self.subject),
            score: self.score,
            award: self.award,
        })
    }
}

/// Render a score with two decimals, e.g. `18.5` as `"18.50"`.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}
