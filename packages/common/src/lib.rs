pub mod award;
pub mod duplicate;
pub mod import;
pub mod normalize;
pub mod record;
pub mod roster;
pub mod search;
pub mod view;

pub use award::Award;
pub use duplicate::{Duplicate, IdentityField, check_duplicate};
pub use record::{FieldError, StudentDraft, StudentFields, format_score};
pub use roster::{Roster, RosterEntry};
