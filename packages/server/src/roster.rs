//! Cached roster snapshot used by duplicate checks and bulk import.

use std::sync::Arc;

use common::{Roster, RosterEntry};
use sea_orm::*;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::entity::student;

/// Lazily loaded copy of the roster's identifying fields.
///
/// The snapshot may be stale with respect to other processes writing to the
/// same database; the unique constraints on `sbd` and `cccd` remain the final
/// arbiter. Call [`RosterCache::invalidate`] after every successful mutation.
#[derive(Default)]
pub struct RosterCache {
    snapshot: RwLock<Option<Arc<Roster>>>,
}

impl RosterCache {
    /// Return the cached snapshot, loading it from `db` if absent.
    pub async fn snapshot<C: ConnectionTrait>(&self, db: &C) -> Result<Arc<Roster>, DbErr> {
        if let Some(roster) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(roster));
        }

        let mut slot = self.snapshot.write().await;
        if let Some(roster) = slot.as_ref() {
            return Ok(Arc::clone(roster));
        }

        let roster = Arc::new(load_roster(db).await?);
        debug!(records = roster.len(), "Roster snapshot loaded");
        *slot = Some(Arc::clone(&roster));
        Ok(roster)
    }

    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }
}

/// Read the identifying fields of every record, most recent first.
pub async fn load_roster<C: ConnectionTrait>(db: &C) -> Result<Roster, DbErr> {
    let rows = student::Entity::find()
        .select_only()
        .column(student::Column::Id)
        .column(student::Column::FullName)
        .column(student::Column::Sbd)
        .column(student::Column::Cccd)
        .order_by_desc(student::Column::CreatedAt)
        .into_tuple::<(Uuid, String, String, String)>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, full_name, sbd, cccd)| RosterEntry {
            id,
            full_name,
            sbd,
            cccd,
        })
        .collect())
}
