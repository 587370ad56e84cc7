use std::fmt;

use uuid::Uuid;

use crate::normalize::{national_id_digits, normalize_sbd};
use crate::roster::{Roster, RosterEntry};

/// Which identifying field two records share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    ExamId,
    NationalId,
}

impl IdentityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExamId => "sbd",
            Self::NationalId => "cccd",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExamId => f.write_str("exam ID"),
            Self::NationalId => f.write_str("national ID"),
        }
    }
}

/// A roster entry that collides with a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplicate<'a> {
    pub record: &'a RosterEntry,
    /// The first field found to collide; exam ID is checked before national ID.
    pub field: IdentityField,
}

/// Find a record in `roster` sharing the candidate's exam ID or national ID.
///
/// Both sides are normalized before comparison (uppercase-trimmed exam ID,
/// digits-only national ID). The entry whose id equals `exclude_id` is skipped,
/// which lets an update compare a record against everything but itself.
/// Returns the first collision in roster order.
pub fn check_duplicate<'a>(
    sbd: &str,
    cccd: &str,
    roster: &'a Roster,
    exclude_id: Option<Uuid>,
) -> Option<Duplicate<'a>> {
    let sbd = normalize_sbd(sbd);
    let cccd = national_id_digits(cccd);

    roster
        .entries()
        .iter()
        .filter(|record| Some(record.id) != exclude_id)
        .find_map(|record| {
            if !sbd.is_empty() && normalize_sbd(&record.sbd) == sbd {
                Some(Duplicate {
                    record,
                    field: IdentityField::ExamId,
                })
            } else if !cccd.is_empty() && national_id_digits(&record.cccd) == cccd {
                Some(Duplicate {
                    record,
                    field: IdentityField::NationalId,
                })
            } else {
                None
            }
        })
}
