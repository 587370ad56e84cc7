#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Award tier attached to an exam result.
///
/// Serialized and stored as its Vietnamese label. When the `sea-orm` feature is
/// enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum Award {
    /// First prize.
    #[serde(rename = "Giải Nhất")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Giải Nhất"))]
    First,
    /// Second prize.
    #[serde(rename = "Giải Nhì")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Giải Nhì"))]
    Second,
    /// Third prize.
    #[serde(rename = "Giải Ba")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Giải Ba"))]
    Third,
    /// Honorable mention.
    #[serde(rename = "Khuyến khích")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Khuyến khích"))]
    HonorableMention,
    /// Not awarded.
    #[serde(rename = "Không đạt")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Không đạt"))]
    #[default]
    NotAwarded,
}

impl Award {
    pub const ALL: &'static [Award] = &[
        Self::First,
        Self::Second,
        Self::Third,
        Self::HonorableMention,
        Self::NotAwarded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "Giải Nhất",
            Self::Second => "Giải Nhì",
            Self::Third => "Giải Ba",
            Self::HonorableMention => "Khuyến khích",
            Self::NotAwarded => "Không đạt",
        }
    }

    /// Parse a spreadsheet cell. Blank cells mean "not awarded".
    pub fn from_cell(cell: &str) -> Result<Self, ParseAwardError> {
        if cell.trim().is_empty() {
            return Ok(Self::NotAwarded);
        }
        cell.parse()
    }
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown award '{invalid}'")]
pub struct ParseAwardError {
    pub invalid: String,
}

impl FromStr for Award {
    type Err = ParseAwardError;

    /// Labels match after trimming, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|award| award.label().to_lowercase() == wanted)
            .ok_or_else(|| ParseAwardError {
                invalid: s.trim().to_string(),
            })
    }
}
