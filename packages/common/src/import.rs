//! Bulk import of spreadsheet rows into the roster.
//!
//! A sheet is read positionally: `[full_name, sbd, cccd, school, subject,
//! score, award]`, with the first row treated as a header. Validation is
//! all-or-nothing: the first offending row rejects the whole batch and nothing
//! is inserted.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::award::Award;
use crate::duplicate::{IdentityField, check_duplicate};
use crate::record::{FieldError, StudentDraft, StudentFields};
use crate::roster::Roster;

pub const TEMPLATE_FILE_NAME: &str = "Mau_Nhap_Diem_HSG.xlsx";
pub const TEMPLATE_SHEET_NAME: &str = "Mau_Nhap_Lieu";

pub const TEMPLATE_HEADERS: [&str; 7] = [
    "Họ và tên",
    "Số báo danh",
    "CCCD",
    "Trường",
    "Môn thi",
    "Điểm",
    "Xếp giải",
];

/// Column widths (in characters) used when rendering the template.
pub const TEMPLATE_COLUMN_WIDTHS: [f64; 7] = [25.0, 15.0, 15.0, 20.0, 15.0, 10.0, 15.0];

pub struct TemplateRow {
    pub full_name: &'static str,
    pub sbd: &'static str,
    pub cccd: &'static str,
    pub school: &'static str,
    pub subject: &'static str,
    pub score: f64,
    pub award: Award,
}

pub const TEMPLATE_SAMPLE_ROWS: [TemplateRow; 2] = [
    TemplateRow {
        full_name: "NGUYỄN VĂN A",
        sbd: "HSG001",
        cccd: "001203004567",
        school: "THPT Chuyên",
        subject: "Toán học",
        score: 18.5,
        award: Award::First,
    },
    TemplateRow {
        full_name: "TRẦN THỊ B",
        sbd: "HSG002",
        cccd: "001203004568",
        school: "THPT A",
        subject: "Vật lý",
        score: 15.0,
        award: Award::Third,
    },
];

/// One data row of an uploaded sheet, cells still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based row number in the sheet (the header is row 1).
    pub row_number: usize,
    pub full_name: String,
    pub sbd: String,
    pub cccd: String,
    pub school: String,
    pub subject: String,
    pub score: String,
    pub award: String,
}

/// Turn raw sheet rows into [`ImportRow`]s.
///
/// The first row is the header and is skipped, as are rows whose cells are all
/// blank. Missing trailing cells read as empty.
pub fn rows_from_sheet(sheet: Vec<Vec<String>>) -> Vec<ImportRow> {
    sheet
        .into_iter()
        .enumerate()
        .skip(1)
        .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|(index, cells)| {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().unwrap_or_default();
            ImportRow {
                row_number: index + 1,
                full_name: next(),
                sbd: next(),
                cccd: next(),
                school: next(),
                subject: next(),
                score: next(),
                award: next(),
            }
        })
        .collect()
}

/// Parse a score cell. Either `.` or `,` may be the decimal separator;
/// anything unparseable counts as 0.
pub fn parse_score(cell: &str) -> f64 {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Why a batch was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    Field(FieldError),
    UnknownAward {
        value: String,
    },
    /// Two rows of the same batch share an identifying value.
    DuplicateInBatch {
        field: IdentityField,
        value: String,
        first_row: usize,
    },
    /// A row collides with a record already in the roster.
    DuplicateInRoster {
        field: IdentityField,
        value: String,
        existing_id: Uuid,
    },
}

impl RejectionReason {
    /// Stable machine-readable name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::Field(err) => err.rule(),
            Self::UnknownAward { .. } => "unknown_award",
            Self::DuplicateInBatch { .. } => "duplicate_in_batch",
            Self::DuplicateInRoster { .. } => "duplicate_in_roster",
        }
    }

    /// The offending value, when the rule is about a specific value.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Field(_) => None,
            Self::UnknownAward { value }
            | Self::DuplicateInBatch { value, .. }
            | Self::DuplicateInRoster { value, .. } => Some(value),
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::UnknownAward { value } => write!(f, "unknown award '{value}'"),
            Self::DuplicateInBatch {
                field,
                value,
                first_row,
            } => write!(f, "{field} {value} already appears on row {first_row}"),
            Self::DuplicateInRoster { field, value, .. } => {
                write!(f, "{field} {value} already exists in the roster")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Row {row}: {reason}")]
pub struct ImportRejection {
    pub row: usize,
    pub reason: RejectionReason,
}

/// Validate a whole batch against itself and the current roster.
///
/// Rows are processed in order. Each row is normalized and structurally
/// checked, then compared with the rows already accepted in this batch, then
/// with `roster`. The first failure rejects the batch.
pub fn validate_batch(
    rows: &[ImportRow],
    roster: &Roster,
) -> Result<Vec<StudentFields>, ImportRejection> {
    let mut seen_sbd: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut seen_cccd: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut accepted = Vec::with_capacity(rows.len());

    for row in rows {
        let reject = |reason: RejectionReason| ImportRejection {
            row: row.row_number,
            reason,
        };

        let award = Award::from_cell(&row.award)
            .map_err(|e| reject(RejectionReason::UnknownAward { value: e.invalid }))?;

        let fields = StudentDraft {
            full_name: row.full_name.clone(),
            sbd: row.sbd.clone(),
            cccd: row.cccd.clone(),
            school: row.school.clone(),
            subject: row.subject.clone(),
            score: parse_score(&row.score),
            award,
        }
        .normalize()
        .map_err(|e| reject(RejectionReason::Field(e)))?;

        if let Some(&first_row) = seen_sbd.get(&fields.sbd) {
            return Err(reject(RejectionReason::DuplicateInBatch {
                field: IdentityField::ExamId,
                value: fields.sbd,
                first_row,
            }));
        }
        if let Some(&first_row) = seen_cccd.get(&fields.cccd) {
            return Err(reject(RejectionReason::DuplicateInBatch {
                field: IdentityField::NationalId,
                value: fields.cccd,
                first_row,
            }));
        }

        if let Some(dup) = check_duplicate(&fields.sbd, &fields.cccd, roster, None) {
            let value = match dup.field {
                IdentityField::ExamId => fields.sbd,
                IdentityField::NationalId => fields.cccd,
            };
            return Err(reject(RejectionReason::DuplicateInRoster {
                field: dup.field,
                value,
                existing_id: dup.record.id,
            }));
        }

        seen_sbd.insert(fields.sbd.clone(), row.row_number);
        seen_cccd.insert(fields.cccd.clone(), row.row_number);
        accepted.push(fields);
    }

    Ok(accepted)
}
