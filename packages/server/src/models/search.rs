use common::{Award, format_score};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public lookup form. All three fields are required.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    #[schema(example = "Nguyễn Văn An")]
    pub full_name: String,
    #[schema(example = "HSG001")]
    pub sbd: String,
    /// Separators are ignored; only the first 12 digits are used.
    #[schema(example = "001203004567")]
    pub cccd: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResultResponse {
    pub id: Uuid,
    #[schema(example = "NGUYỄN VĂN AN")]
    pub full_name: String,
    #[schema(example = "HSG001")]
    pub sbd: String,
    #[schema(example = "001203004567")]
    pub cccd: String,
    pub school: String,
    pub subject: String,
    pub score: f64,
    #[schema(example = "18.50")]
    pub score_display: String,
    pub award: Award,
}

impl From<crate::entity::student::Model> for SearchResultResponse {
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
        }
    }
}
