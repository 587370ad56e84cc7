use thiserror::Error;

use crate::normalize::{NationalIdError, canonical_national_id, normalize_name, normalize_sbd};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchInputError {
    #[error("Full name must not be empty")]
    MissingName,
    #[error("Exam ID must not be empty")]
    MissingExamId,
    #[error(transparent)]
    NationalId(#[from] NationalIdError),
}

/// Lookup key built from the three public form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub full_name: String,
    pub sbd: String,
    pub cccd: String,
}

impl SearchQuery {
    pub fn normalize(full_name: &str, sbd: &str, cccd: &str) -> Result<Self, SearchInputError> {
        let full_name = normalize_name(full_name);
        if full_name.is_empty() {
            return Err(SearchInputError::MissingName);
        }
        let sbd = normalize_sbd(sbd);
        if sbd.is_empty() {
            return Err(SearchInputError::MissingExamId);
        }
        let cccd = canonical_national_id(cccd)?;

        Ok(Self {
            full_name,
            sbd,
            cccd,
        })
    }

    /// Whole-string, case-insensitive comparison with a stored name.
    pub fn name_matches(&self, stored: &str) -> bool {
        normalize_name(stored) == self.full_name
    }
}
