use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_max_chars;

/// Editable header and footer text shown on every page.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SiteConfigRequest {
    #[schema(example = "SỞ GIÁO DỤC VÀ ĐÀO TẠO")]
    pub header_top: String,
    pub header_sub: String,
    pub main_title: String,
    pub footer_copyright: String,
    pub footer_address: String,
    pub footer_support: String,
    /// `http(s)://` URL or `data:image/...` URI. Omit or send empty to clear.
    pub favicon_url: Option<String>,
}

impl SiteConfigRequest {
    /// Trim every field and clear an empty favicon.
    pub fn validate(mut self) -> Result<Self, AppError> {
        for (name, value) in [
            ("Header top", &mut self.header_top),
            ("Header sub", &mut self.header_sub),
            ("Main title", &mut self.main_title),
            ("Footer copyright", &mut self.footer_copyright),
            ("Footer address", &mut self.footer_address),
            ("Footer support", &mut self.footer_support),
        ] {
            validate_max_chars(name, value, 512)?;
            *value = value.trim().to_string();
        }
        if self.main_title.is_empty() {
            return Err(AppError::Validation("Main title must not be empty".into()));
        }

        self.favicon_url = match self.favicon_url.take().map(|u| u.trim().to_string()) {
            Some(url) if url.is_empty() => None,
            Some(url) => {
                let allowed = url.starts_with("http://")
                    || url.starts_with("https://")
                    || url.starts_with("data:image/");
                if !allowed {
                    return Err(AppError::Validation(
                        "Favicon must be an http(s) URL or a data:image URI".into(),
                    ));
                }
                if url.len() > 256 * 1024 {
                    return Err(AppError::Validation("Favicon is too large".into()));
                }
                Some(url)
            }
            None => None,
        };

        Ok(self)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SiteConfigResponse {
    pub header_top: String,
    pub header_sub: String,
    pub main_title: String,
    pub footer_copyright: String,
    pub footer_address: String,
    pub footer_support: String,
    pub favicon_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::site_config::Model> for SiteConfigResponse {
    fn from(m: crate::entity::site_config::Model) -> Self {
        Self {
            header_top: m.header_top,
            header_sub: m.header_sub,
            main_title: m.main_title,
            footer_copyright: m.footer_copyright,
            footer_address: m.footer_address,
            footer_support: m.footer_support,
            favicon_url: m.favicon_url,
            updated_at: m.updated_at,
        }
    }
}
