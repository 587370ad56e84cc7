use uuid::Uuid;

/// Identifying fields of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: Uuid,
    pub full_name: String,
    pub sbd: String,
    pub cccd: String,
}

/// Snapshot of the persisted roster at a point in time.
///
/// Entries keep the order they were loaded in (most recent first), which is
/// the order duplicate checks walk them.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RosterEntry> for Roster {
    fn from_iter<I: IntoIterator<Item = RosterEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
