use common::import::{ImportRejection, RejectionReason};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImportResponse {
    /// Number of records inserted; always the full batch.
    #[schema(example = 42)]
    pub inserted: usize,
}

/// Why an import batch was refused. Nothing from the batch was written.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RejectionDetails {
    /// Spreadsheet row (1-based, the header is row 1).
    #[schema(example = 7)]
    pub row: usize,
    /// Rule that failed: `missing_name`, `missing_exam_id`, `invalid_national_id`,
    /// `invalid_score`, `unknown_award`, `duplicate_in_batch` or `duplicate_in_roster`.
    #[schema(example = "duplicate_in_batch")]
    pub rule: &'static str,
    #[schema(example = "exam ID HSG001 already appears on row 3")]
    pub message: String,
    /// `sbd` or `cccd` for duplicate rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Earlier row of the same batch holding the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_row: Option<usize>,
    /// Stored record holding the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<Uuid>,
}

impl From<&ImportRejection> for RejectionDetails {
    fn from(rejection: &ImportRejection) -> Self {
        let reason = &rejection.reason;
        let (field, first_row, existing_id) = match reason {
            RejectionReason::DuplicateInBatch {
                field, first_row, ..
            } => (Some(field.as_str()), Some(*first_row), None),
            RejectionReason::DuplicateInRoster {
                field, existing_id, ..
            } => (Some(field.as_str()), None, Some(*existing_id)),
            _ => (None, None, None),
        };

        Self {
            row: rejection.row,
            rule: reason.rule(),
            message: reason.to_string(),
            field,
            value: reason.value().map(str::to_owned),
            first_row,
            existing_id,
        }
    }
}
