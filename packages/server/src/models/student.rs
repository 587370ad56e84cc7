use chrono::{DateTime, Utc};
use common::{Award, FieldError, StudentDraft, StudentFields, format_score};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub use super::shared::{Pagination, escape_like};
use super::shared::validate_max_chars;

/// Body for creating a record or replacing one wholesale.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentRequest {
    /// Full name; stored uppercase with single spaces.
    #[schema(example = "Nguyễn Văn An")]
    pub full_name: String,
    /// Exam ID; stored uppercase.
    #[schema(example = "HSG001")]
    pub sbd: String,
    /// National ID; non-digits are stripped and exactly 12 digits must remain.
    #[schema(example = "001203004567")]
    pub cccd: String,
    #[serde(default)]
    #[schema(example = "THPT Chuyên Hà Nội - Amsterdam")]
    pub school: String,
    #[serde(default)]
    #[schema(example = "Toán học")]
    pub subject: String,
    /// Non-negative score.
    #[schema(example = 18.5)]
    pub score: f64,
    /// Award tier; defaults to "Không đạt".
    #[serde(default)]
    pub award: Award,
}

impl StudentRequest {
    /// Validate lengths, then canonicalize through the shared record rules.
    pub fn into_fields(self) -> Result<StudentFields, AppError> {
        validate_max_chars("Full name", &self.full_name, 128)?;
        validate_max_chars("Exam ID", &self.sbd, 32)?;
        validate_max_chars("National ID", &self.cccd, 32)?;
        validate_max_chars("School", &self.school, 256)?;
        validate_max_chars("Subject", &self.subject, 256)?;

        StudentDraft {
            full_name: self.full_name,
            sbd: self.sbd,
            cccd: self.cccd,
            school: self.school,
            subject: self.subject,
            score: self.score,
            award: self.award,
        }
        .normalize()
        .map_err(|e: FieldError| AppError::Validation(e.to_string()))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    #[schema(example = "NGUYỄN VĂN AN")]
    pub full_name: String,
    #[schema(example = "HSG001")]
    pub sbd: String,
    #[schema(example = "001203004567")]
    pub cccd: String,
    pub school: String,
    pub subject: String,
    #[schema(example = 18.5)]
    pub score: f64,
    /// Score with two decimals.
    #[schema(example = "18.50")]
    pub score_display: String,
    pub award: Award,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::student::Model> for StudentResponse {
    fn from(m: crate::entity::student::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            sbd: m.sbd,
            cccd: m.cccd,
            school: m.school,
            subject: m.subject,
            score: m.score,
            score_display: format_score(m.score),
            award: m.award,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentListResponse {
    pub data: Vec<StudentResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
    /// Case-insensitive match on full name or exam ID.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteAllQuery {
    /// Must be `true`; deleting the whole roster cannot be undone.
    pub confirm: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteAllResponse {
    /// Number of records removed.
    #[schema(example = 120)]
    pub deleted: u64,
}
